use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::command::COMMANDS;
use crate::config::MENU_ITEMS;
use crate::ui_state::{
    ChatAnalyzerState, DashboardState, IceBreakerState, MoreOptionsState, Screen, View,
};

// Copper Sapphire Morning color palette
const BG_DARK: Color = Color::Rgb(12, 12, 16);           // Deep background
const BG_PANEL: Color = Color::Rgb(18, 18, 24);          // Slightly lighter for panels

// Sapphire blues
const SAPPHIRE: Color = Color::Rgb(101, 150, 243);       // #6596F3 - Primary accent
const CYAN_LIGHT: Color = Color::Rgb(178, 220, 226);     // #B2DCE2 - Light cyan

// Copper/warm tones
const COPPER: Color = Color::Rgb(138, 72, 38);           // #8A4826 - Copper
const WARM_BROWN: Color = Color::Rgb(164, 103, 38);      // #A46726 - Warm brown
const TAN: Color = Color::Rgb(216, 180, 169);            // #D8B4A9 - Tan/beige
const PALE_YELLOW: Color = Color::Rgb(234, 208, 148);    // #EAD094 - Pale yellow

// Accent colors
const BURGUNDY: Color = Color::Rgb(204, 92, 68);         // #CC5C44 - Warnings/errors
const OLIVE: Color = Color::Rgb(131, 179, 102);          // #83B366 - Success/green
const LAVENDER: Color = Color::Rgb(211, 164, 234);       // #D3A4EA - Purple accent

// Text colors
const TEXT_PRIMARY: Color = Color::Rgb(240, 240, 245);   // Near white
const TEXT_SECONDARY: Color = Color::Rgb(180, 180, 190); // Light gray
const TEXT_MUTED: Color = Color::Rgb(105, 116, 133);     // #697485 - Medium gray

// Border colors (subtle)
const BORDER_DIM: Color = Color::Rgb(45, 50, 60);        // Dim border
const BORDER_ACCENT: Color = Color::Rgb(70, 85, 110);    // Accent border

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

const LOGO: [&str; 6] = [
    "███████╗██╗     ███████╗ ██████╗██╗  ██╗ █████╗ ███████╗ ██████╗ ",
    "██╔════╝██║     ██╔════╝██╔════╝██║  ██║██╔══██╗╚══███╔╝██╔═══██╗",
    "█████╗  ██║     █████╗  ██║     ███████║███████║  ███╔╝ ██║   ██║",
    "██╔══╝  ██║     ██╔══╝  ██║     ██╔══██║██╔══██║ ███╔╝  ██║   ██║",
    "██║     ███████╗███████╗╚██████╗██║  ██║██║  ██║███████╗╚██████╔╝",
    "╚═╝     ╚══════╝╚══════╝ ╚═════╝╚═╝  ╚═╝╚═╝  ╚═╝╚══════╝ ╚═════╝ ",
];

pub fn draw(frame: &mut Frame, app: &App) {
    // Fill entire background
    let bg = Block::default().style(Style::default().bg(BG_DARK));
    frame.render_widget(bg, frame.area());

    match &app.ui.screen {
        Screen::Login => draw_login(frame, app),
        Screen::Dashboard(state) => draw_dashboard(frame, app, state),
        Screen::IceBreaker(state) => draw_ice_breaker(frame, app, state),
        Screen::ChatAnalyzer(state) => draw_chat_analyzer(frame, app, state),
        Screen::MoreOptions(state) => draw_more_options(frame, app, state),
    }

    draw_status(frame, app);
}

fn draw_login(frame: &mut Frame, app: &App) {
    let area = frame.area();

    draw_background_pattern(frame, area, app.animation_frame);

    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Length(10),  // Logo container
            Constraint::Length(3),   // Tagline
            Constraint::Length(3),   // Hint
            Constraint::Min(0),
        ])
        .split(area);

    let logo_area = centered(v_chunks[1], 72, v_chunks[1].height);
    draw_glass_border(frame, logo_area, "", app.animation_frame, true);

    let inner = Rect {
        x: logo_area.x + 2,
        y: logo_area.y + 1,
        width: logo_area.width.saturating_sub(4),
        height: logo_area.height.saturating_sub(2),
    };
    draw_animated_logo(frame, inner, app.animation_frame);

    // Tagline with typing animation
    let tagline = "Deja que la IA encienda la chispa. Genera respuestas y frases que de verdad funcionan.";
    let total = tagline.chars().count();
    let visible = ((app.animation_tick as f64 / 120.0 * total as f64) as usize).min(total);
    let mut typed: String = tagline.chars().take(visible).collect();
    if visible < total {
        typed.push('|');
    }
    let tagline_widget = Paragraph::new(typed)
        .alignment(Alignment::Center)
        .style(Style::default().fg(TEXT_SECONDARY))
        .wrap(Wrap { trim: true });
    frame.render_widget(tagline_widget, v_chunks[2]);

    let hint = Paragraph::new("[ Enter para empezar ]")
        .alignment(Alignment::Center)
        .style(Style::default().fg(copper_glow(app.animation_frame)));
    frame.render_widget(hint, v_chunks[3]);

    let version_area = Rect {
        x: area.x,
        y: area.height.saturating_sub(2),
        width: area.width,
        height: 1,
    };
    let version = Paragraph::new(concat!("v", env!("CARGO_PKG_VERSION")))
        .alignment(Alignment::Center)
        .style(Style::default().fg(TEXT_MUTED));
    frame.render_widget(version, version_area);
}

fn draw_background_pattern(frame: &mut Frame, area: Rect, anim_frame: usize) {
    let pattern_offset = (anim_frame / 30) % 4;

    // Sparse floating hearts
    let mut lines: Vec<Line> = Vec::new();

    for y in 0..area.height as usize {
        let mut spans: Vec<Span> = Vec::new();
        for x in 0..area.width as usize {
            let show = ((x + pattern_offset) % 14 == 0) && ((y + pattern_offset) % 7 == 0);
            if show {
                let brightness = 25 + ((anim_frame as f64 / 60.0 + (x as f64 / 14.0)).sin().abs() * 20.0) as u8;
                let color = Color::Rgb(brightness + 10, brightness, brightness + 2);
                spans.push(Span::styled("♥", Style::default().fg(color)));
            } else {
                spans.push(Span::raw(" "));
            }
        }
        lines.push(Line::from(spans));
    }

    let pattern = Paragraph::new(lines).style(Style::default().bg(BG_DARK));
    frame.render_widget(pattern, area);
}

fn draw_glass_border(frame: &mut Frame, area: Rect, title: &str, anim_frame: usize, glow: bool) {
    // Animated border - cycles between sapphire and copper
    let border_color = if glow {
        let t = (anim_frame as f64 / 120.0).sin() * 0.5 + 0.5;
        let r = (84.0 + (138.0 - 84.0) * t) as u8;
        let g = (112.0 + (72.0 - 112.0) * t) as u8;
        let b = (156.0 + (38.0 - 156.0) * t) as u8;
        Color::Rgb(r, g, b)
    } else {
        BORDER_DIM
    };

    let block = Block::default()
        .title(Span::styled(title, Style::default().fg(SAPPHIRE).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color));

    frame.render_widget(block, area);
}

fn draw_animated_logo(frame: &mut Frame, area: Rect, anim_frame: usize) {
    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(""));

    for (line_idx, logo_line) in LOGO.iter().enumerate() {
        let mut spans: Vec<Span> = Vec::new();

        for (char_idx, ch) in logo_line.chars().enumerate() {
            // Wave between burgundy and tan
            let wave_offset = (anim_frame as f64 / 25.0) + (char_idx as f64 / 6.0) - (line_idx as f64 / 2.0);
            let wave = wave_offset.sin() * 0.5 + 0.5;
            let phase = ((anim_frame as f64 / 200.0) + (char_idx as f64 / 25.0)) % 2.0;

            let (r, g, b) = if phase < 1.0 {
                let t = phase * wave;
                (
                    (204.0 + (216.0 - 204.0) * t) as u8,
                    (92.0 + (180.0 - 92.0) * t) as u8,
                    (68.0 + (169.0 - 68.0) * t) as u8,
                )
            } else {
                let t = (phase - 1.0) * wave;
                (
                    (216.0 + (204.0 - 216.0) * t) as u8,
                    (180.0 + (92.0 - 180.0) * t) as u8,
                    (169.0 + (68.0 - 169.0) * t) as u8,
                )
            };

            spans.push(Span::styled(
                ch.to_string(),
                Style::default().fg(Color::Rgb(r, g, b)),
            ));
        }

        lines.push(Line::from(spans));
    }

    let logo = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(logo, area);
}

fn copper_glow(anim_frame: usize) -> Color {
    let glow = (anim_frame as f64 / 45.0).sin().abs() * 0.5 + 0.5;
    let r = (138.0 + (216.0 - 138.0) * glow) as u8;
    let g = (72.0 + (180.0 - 72.0) * glow) as u8;
    let b = (38.0 + (169.0 - 38.0) * glow) as u8;
    Color::Rgb(r, g, b)
}

/// A `width` x `height` rect centered in `area`, shrunk to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Cut `text` to at most `max` display columns, with an ellipsis.
fn truncate(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// Shared frame for the sub-screens: header with a back hint, a body, and a
/// key-hint footer. Returns the body rect.
fn draw_sub_screen(frame: &mut Frame, view: View, hints: &[(&str, &str)]) -> Rect {
    let area = frame.area();
    let padded = Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),   // Header
            Constraint::Min(5),      // Body
            Constraint::Length(1),   // Status
            Constraint::Length(1),   // Hints
        ])
        .split(padded);

    let header_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_ACCENT));
    let header_inner = header_block.inner(chunks[0]);
    frame.render_widget(header_block, chunks[0]);

    let header = Line::from(vec![
        Span::styled(" ← Esc ", Style::default().fg(TEXT_MUTED)),
        Span::styled(
            view.title(),
            Style::default().fg(TAN).add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(header), header_inner);

    draw_key_hints(frame, chunks[3], hints);

    chunks[1]
}

fn draw_key_hints(frame: &mut Frame, area: Rect, hints: &[(&str, &str)]) {
    let mut spans: Vec<Span> = Vec::new();
    for (key, label) in hints {
        spans.push(Span::styled(
            format!(" {}", key),
            Style::default().fg(SAPPHIRE).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(format!(" {} ", label), Style::default().fg(TEXT_MUTED)));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        area,
    );
}

fn draw_status(frame: &mut Frame, app: &App) {
    let Some(message) = &app.ui.status_message else {
        return;
    };
    let area = frame.area();
    if area.height < 3 {
        return;
    }
    let status_area = Rect {
        x: area.x + 1,
        y: area.y + area.height - 3,
        width: area.width.saturating_sub(2),
        height: 1,
    };
    frame.render_widget(Clear, status_area);
    let status = Paragraph::new(truncate(message, status_area.width as usize))
        .alignment(Alignment::Center)
        .style(Style::default().fg(PALE_YELLOW).bg(BG_DARK));
    frame.render_widget(status, status_area);
}

fn draw_dashboard(frame: &mut Frame, app: &App, state: &DashboardState) {
    let area = frame.area();
    draw_background_pattern(frame, area, app.animation_frame);

    let content = centered(area, 60, 24);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),   // Title
            Constraint::Length(3),   // Quote
            Constraint::Length(1),   // Gap
            Constraint::Length(5),   // Stat cards
            Constraint::Length(1),   // Gap
            Constraint::Length(9),   // Menu
            Constraint::Min(0),
        ])
        .split(content);

    let title = Paragraph::new(Line::from(vec![
        Span::styled("♥ ", Style::default().fg(BURGUNDY)),
        Span::styled("Flechazo AI", Style::default().fg(TEXT_PRIMARY).add_modifier(Modifier::BOLD)),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    let quote = Paragraph::new(
        "\"El 68% de las personas deja de contestar después de un \"hola\".\" No seas uno de ellos.",
    )
    .alignment(Alignment::Center)
    .style(Style::default().fg(TEXT_SECONDARY))
    .wrap(Wrap { trim: true });
    frame.render_widget(quote, chunks[1]);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(50),
            Constraint::Percentage(50),
        ])
        .split(chunks[3]);

    draw_stat_card(
        frame,
        cards[0],
        app.animated_stat(app.stats.generated),
        "Ice Breakers Generados",
        COPPER,
    );
    draw_stat_card(
        frame,
        cards[1],
        app.animated_stat(app.stats.analyzed),
        "Conversaciones Analizadas",
        SAPPHIRE,
    );

    draw_menu(frame, app, state, chunks[5]);

    let hints_area = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };
    draw_key_hints(
        frame,
        hints_area,
        &[("1-3", "abrir"), ("↑↓", "mover"), ("Enter", "elegir"), ("q", "salir")],
    );
}

fn draw_stat_card(frame: &mut Frame, area: Rect, value: u64, label: &str, accent: Color) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_DIM))
        .style(Style::default().bg(BG_PANEL));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(Span::styled(
            value.to_string(),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            truncate(label, inner.width as usize),
            Style::default().fg(TEXT_MUTED),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn draw_menu(frame: &mut Frame, app: &App, state: &DashboardState, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(area);

    for (i, (key, label)) in MENU_ITEMS.iter().enumerate() {
        let Some(row) = rows.get(i) else {
            break;
        };
        let selected = state.selection == i;
        let border_color = if selected {
            copper_glow(app.animation_frame)
        } else {
            BORDER_DIM
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color));
        let inner = block.inner(*row);
        frame.render_widget(block, *row);

        let label_style = if selected {
            Style::default().fg(TEXT_PRIMARY).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT_SECONDARY)
        };
        let line = Line::from(vec![
            Span::styled(format!(" {} ", key), Style::default().fg(SAPPHIRE).add_modifier(Modifier::BOLD)),
            Span::styled(*label, label_style),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
    }
}

fn draw_ice_breaker(frame: &mut Frame, app: &App, state: &IceBreakerState) {
    let body = draw_sub_screen(
        frame,
        View::IceBreaker,
        &[("g", "generar"), ("↑↓", "elegir"), ("c", "copiar"), ("Esc", "volver")],
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),      // Lines
            Constraint::Length(3),   // Generate button
        ])
        .split(body);

    if state.loading {
        draw_loading(frame, app, chunks[0], "Generando...");
    } else if state.lines.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("♥", Style::default().fg(BURGUNDY))),
            Line::from(""),
            Line::from(Span::styled(
                "Rompe el hielo con un botón.",
                Style::default().fg(TEXT_PRIMARY).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Genera frases que nadie podrá ignorar.",
                Style::default().fg(TEXT_MUTED),
            )),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(empty, centered(chunks[0], chunks[0].width, 6));
    } else {
        draw_ice_breaker_lines(frame, app, state, chunks[0]);
    }

    let label = if state.loading { "Generando..." } else { "Generar Flechazos" };
    draw_button(frame, app, chunks[1], "g", label, state.loading);
}

fn draw_ice_breaker_lines(frame: &mut Frame, app: &App, state: &IceBreakerState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_DIM));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let wrap_width = (inner.width as usize).max(1);
    let mut lines: Vec<Line> = Vec::new();
    let mut row = 0;
    let mut selected_end = 0;

    for (i, text) in state.lines.iter().enumerate() {
        let selected = i == state.selected;
        let marker = if selected { "▸ " } else { "  " };
        let number = format!("{}. ", i + 1);
        let copied = state.copied.map_or(false, |flash| flash.index == i);
        let text_style = if selected {
            Style::default().fg(TEXT_PRIMARY).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT_SECONDARY)
        };

        let mut spans = vec![
            Span::styled(marker, Style::default().fg(copper_glow(app.animation_frame))),
            Span::styled(number.clone(), Style::default().fg(TEXT_MUTED)),
            Span::styled(text.as_str(), text_style),
        ];
        let mut width = marker.width() + number.width() + text.width();
        if copied {
            spans.push(Span::styled(
                "  ¡Copiado!",
                Style::default().fg(OLIVE).add_modifier(Modifier::BOLD),
            ));
            width += "  ¡Copiado!".width();
        }
        lines.push(Line::from(spans));
        lines.push(Line::from(""));

        // Rough wrapped height, enough to keep the highlight on screen
        row += width.div_ceil(wrap_width).max(1) + 1;
        if selected {
            selected_end = row;
        }
    }

    let scroll = selected_end.saturating_sub(inner.height as usize) as u16;
    let list = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .scroll((scroll, 0));
    frame.render_widget(list, inner);
}

fn draw_loading(frame: &mut Frame, app: &App, area: Rect, label: &str) {
    let spinner = SPINNER_FRAMES[(app.animation_frame / 6) % SPINNER_FRAMES.len()];
    let loading = Paragraph::new(Line::from(vec![
        Span::styled(format!("{} ", spinner), Style::default().fg(SAPPHIRE)),
        Span::styled(label, Style::default().fg(TEXT_SECONDARY)),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(loading, centered(area, area.width, 1));
}

fn draw_button(frame: &mut Frame, app: &App, area: Rect, key: &str, label: &str, disabled: bool) {
    let button_area = centered(area, 34, 3);
    let (border, text) = if disabled {
        (BORDER_DIM, TEXT_MUTED)
    } else {
        (copper_glow(app.animation_frame), TEXT_PRIMARY)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border));
    let inner = block.inner(button_area);
    frame.render_widget(block, button_area);

    let line = Line::from(vec![
        Span::styled(format!("[{}] ", key), Style::default().fg(SAPPHIRE)),
        Span::styled(label, Style::default().fg(text).add_modifier(Modifier::BOLD)),
    ]);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), inner);
}

fn draw_chat_analyzer(frame: &mut Frame, app: &App, state: &ChatAnalyzerState) {
    let body = draw_sub_screen(
        frame,
        View::ChatAnalyzer,
        &[("Enter", "generar / comando"), ("←→", "tono"), ("Ctrl+Y", "copiar"), ("Esc", "volver")],
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),   // Attachment
            Constraint::Min(4),      // Reply
            Constraint::Length(4),   // Tone
            Constraint::Length(3),   // Input
        ])
        .split(body);

    draw_attachment(frame, state, chunks[0]);
    draw_reply(frame, app, state, chunks[1]);
    draw_tone(frame, state, chunks[2]);
    draw_command_input(frame, app, state, chunks[3]);
}

fn draw_attachment(frame: &mut Frame, state: &ChatAnalyzerState, area: Rect) {
    let block = Block::default()
        .title(Span::styled(" Captura ", Style::default().fg(COPPER).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_DIM));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width.saturating_sub(4) as usize;
    let lines = match &state.image {
        Some(image) => vec![
            Line::from(vec![
                Span::styled(" ▣ ", Style::default().fg(OLIVE)),
                Span::styled(
                    truncate(&image.file_name, width),
                    Style::default().fg(TEXT_PRIMARY).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(Span::styled(
                format!("   {} · {}", image.mime_type, image.size_label()),
                Style::default().fg(TEXT_MUTED),
            )),
        ],
        None => vec![
            Line::from(vec![
                Span::styled(" ⇪ ", Style::default().fg(SAPPHIRE)),
                Span::styled("Sube una captura del chat", Style::default().fg(TEXT_PRIMARY)),
            ]),
            Line::from(Span::styled(
                "   Tu imagen es privada y no se guarda. Escribe /open <ruta> o arrastra el archivo.",
                Style::default().fg(TEXT_MUTED),
            )),
        ],
    };
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn draw_reply(frame: &mut Frame, app: &App, state: &ChatAnalyzerState, area: Rect) {
    let title = if state.copied.is_some() { " Respuesta · ¡Copiado! " } else { " Respuesta " };
    let title_color = if state.copied.is_some() { OLIVE } else { LAVENDER };
    let block = Block::default()
        .title(Span::styled(title, Style::default().fg(title_color).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(if state.reply.is_empty() { BORDER_DIM } else { BORDER_ACCENT }));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.loading {
        draw_loading(frame, app, inner, "Creando la respuesta perfecta...");
        return;
    }
    if state.reply.is_empty() {
        let hint = Paragraph::new("Tu respuesta aparecerá aquí.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(TEXT_MUTED));
        frame.render_widget(hint, centered(inner, inner.width, 1));
        return;
    }

    let reply = Paragraph::new(state.reply.as_str())
        .style(Style::default().fg(TEXT_PRIMARY))
        .wrap(Wrap { trim: true });
    frame.render_widget(reply, inner);
}

fn draw_tone(frame: &mut Frame, state: &ChatAnalyzerState, area: Rect) {
    let block = Block::default()
        .title(Span::styled(" Tono ", Style::default().fg(TAN).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_DIM));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let ratio = f64::from(state.tone) / 100.0;
    // Cool for nerdy, warm for spicy
    let color = if state.tone <= 40 {
        SAPPHIRE
    } else if state.tone <= 60 {
        WARM_BROWN
    } else {
        BURGUNDY
    };
    let gauge = Gauge::default()
        .ratio(ratio)
        .gauge_style(Style::default().fg(color).bg(BG_PANEL))
        .label(format!("{}", state.tone));
    frame.render_widget(gauge, rows[0]);

    let pad = (rows[1].width as usize).saturating_sub("+nerd".len() + "+picante".len());
    let labels = Line::from(vec![
        Span::styled("+nerd", Style::default().fg(CYAN_LIGHT)),
        Span::raw(" ".repeat(pad)),
        Span::styled("+picante", Style::default().fg(BURGUNDY)),
    ]);
    frame.render_widget(Paragraph::new(labels), rows[1]);
}

fn draw_command_input(frame: &mut Frame, app: &App, state: &ChatAnalyzerState, area: Rect) {
    // Pulsing border
    let glow = (app.animation_frame as f64 / 90.0).sin() * 0.3 + 0.7;
    let border_color = Color::Rgb((101.0 * glow) as u8, (150.0 * glow) as u8, (243.0 * glow) as u8);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.input.is_empty() {
        let hints: Vec<String> = COMMANDS.iter().map(|(cmd, desc)| format!("{} {}", cmd, desc)).collect();
        let placeholder = Line::from(vec![
            Span::styled(" > ", Style::default().fg(SAPPHIRE)),
            Span::styled(
                truncate(&hints.join(" · "), inner.width.saturating_sub(3) as usize),
                Style::default().fg(TEXT_MUTED).add_modifier(Modifier::ITALIC),
            ),
        ]);
        frame.render_widget(Paragraph::new(placeholder), inner);
        return;
    }

    let cursor = if app.animation_frame % 30 < 15 { "|" } else { " " };
    // Keep the tail visible when the line is longer than the box
    let max = (inner.width as usize).saturating_sub(4);
    let shown: String = if state.input.width() > max {
        let chars: Vec<char> = state.input.chars().collect();
        let mut start = chars.len();
        let mut used = 0;
        while start > 0 {
            let w = unicode_width::UnicodeWidthChar::width(chars[start - 1]).unwrap_or(0);
            if used + w > max {
                break;
            }
            used += w;
            start -= 1;
        }
        chars[start..].iter().collect()
    } else {
        state.input.clone()
    };

    let input = Paragraph::new(format!(" > {}{}", shown, cursor)).style(Style::default().fg(TEXT_PRIMARY));
    frame.render_widget(input, inner);
}

fn draw_more_options(frame: &mut Frame, app: &App, state: &MoreOptionsState) {
    let hints: &[(&str, &str)] = if state.confirming_reset {
        &[("y", "confirmar"), ("n", "cancelar"), ("Esc", "volver")]
    } else {
        &[("r", "reiniciar estadísticas"), ("Esc", "volver")]
    };
    let body = draw_sub_screen(frame, View::MoreOptions, hints);
    let content = centered(body, 56, body.height);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),   // Credits
            Constraint::Length(1),   // Gap
            Constraint::Length(7),   // Settings
            Constraint::Min(0),
        ])
        .split(content);

    let credits_block = Block::default()
        .title(Span::styled(" Créditos ", Style::default().fg(TAN).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_DIM));
    let credits_inner = credits_block.inner(chunks[0]);
    frame.render_widget(credits_block, chunks[0]);
    let credits = Paragraph::new(vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("Hecho con ", Style::default().fg(TEXT_SECONDARY)),
            Span::styled("♥", Style::default().fg(BURGUNDY)),
        ]),
        Line::from(Span::styled(
            format!("Potenciado por la API de Gemini ({}).", app.config.model),
            Style::default().fg(TEXT_MUTED),
        )),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(credits, credits_inner);

    let settings_block = Block::default()
        .title(Span::styled(" Ajustes ", Style::default().fg(TAN).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(if state.confirming_reset { BURGUNDY } else { BORDER_DIM }));
    let settings_inner = settings_block.inner(chunks[2]);
    frame.render_widget(settings_block, chunks[2]);

    let lines = if state.confirming_reset {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                "¿Estás seguro?",
                Style::default().fg(TEXT_PRIMARY).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("[n] ", Style::default().fg(SAPPHIRE)),
                Span::styled("Cancelar", Style::default().fg(TEXT_SECONDARY)),
                Span::raw("     "),
                Span::styled("[y] ", Style::default().fg(BURGUNDY)),
                Span::styled("Confirmar", Style::default().fg(BURGUNDY).add_modifier(Modifier::BOLD)),
            ]),
        ]
    } else {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                format!(
                    "{} frases generadas · {} chats analizados",
                    app.stats.generated, app.stats.analyzed
                ),
                Style::default().fg(TEXT_MUTED),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("[r] ", Style::default().fg(SAPPHIRE)),
                Span::styled(
                    "Reiniciar Estadísticas",
                    Style::default().fg(BURGUNDY).add_modifier(Modifier::BOLD),
                ),
            ]),
        ]
    };
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), settings_inner);
}
