use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::action::Action;
use crate::clipboard::ClipboardSink;
use crate::command::CommandParser;
use crate::config::Config;
use crate::error::ImageError;
use crate::generation::Generator;
use crate::image::ImageAttachment;
use crate::prompts::APOLOGY_PREFIX;
use crate::stats::{CounterStore, Stats};
use crate::ui_state::{CopyFlash, Screen, UIState, View, MENU_VIEWS};

/// Result of a background task, posted back to the main loop.
#[derive(Debug)]
pub enum TaskMessage {
    IceBreakers { mount_id: u64, lines: Vec<String> },
    ChatReply { mount_id: u64, reply: String },
    Attached {
        mount_id: u64,
        path: String,
        result: Result<ImageAttachment, ImageError>,
    },
}

pub struct App {
    pub config: Config,
    pub ui: UIState,
    pub stats: Stats,
    pub animation_frame: usize,
    pub animation_tick: u64,
    pub should_quit: bool,
    counters: CounterStore,
    generator: Generator,
    clipboard: Box<dyn ClipboardSink>,
    task_tx: UnboundedSender<TaskMessage>,
    task_rx: UnboundedReceiver<TaskMessage>,
}

impl App {
    pub fn new(
        config: Config,
        counters: CounterStore,
        generator: Generator,
        clipboard: Box<dyn ClipboardSink>,
    ) -> Self {
        let stats = counters.load();
        let (task_tx, task_rx) = mpsc::unbounded_channel();
        log::info!(
            "Loaded stats: {} analyzed, {} generated",
            stats.analyzed,
            stats.generated
        );

        Self {
            config,
            ui: UIState::new(),
            stats,
            animation_frame: 0,
            animation_tick: 0,
            should_quit: false,
            counters,
            generator,
            clipboard,
            task_tx,
            task_rx,
        }
    }

    pub fn view(&self) -> View {
        self.ui.screen.view()
    }

    pub fn tick(&mut self) {
        self.animation_tick += 1;
        self.animation_frame = (self.animation_frame + 1) % 360;

        let now = self.animation_tick;
        if self.ui.status_message.is_some() && now >= self.ui.status_expires_at {
            self.ui.status_message = None;
        }

        let flash = match &mut self.ui.screen {
            Screen::IceBreaker(state) => &mut state.copied,
            Screen::ChatAnalyzer(state) => &mut state.copied,
            _ => return,
        };
        if flash.map_or(false, |f| now >= f.expires_at) {
            *flash = None;
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.ui.status_message = Some(message.into());
        self.ui.status_expires_at = self.animation_tick + self.config.status_timeout_ticks;
    }

    /// Stat value as the dashboard shows it: counting up from 0 over
    /// `stat_animation_ms` after the dashboard appears.
    pub fn animated_stat(&self, value: u64) -> u64 {
        let Screen::Dashboard(state) = &self.ui.screen else {
            return value;
        };
        let duration = self.config.stat_animation_ticks();
        let elapsed = self.animation_tick.saturating_sub(state.shown_at);
        if elapsed >= duration {
            value
        } else {
            (value as f64 * elapsed as f64 / duration as f64).floor() as u64
        }
    }

    fn navigate(&mut self, view: View) {
        self.ui.mount_id += 1;
        self.ui.screen = Screen::mount(view, self.animation_tick);
        log::debug!("Navigated to {:?} (mount {})", view, self.ui.mount_id);
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => {
                self.should_quit = true;
                return;
            }
            Action::Back => {
                if let Some(target) = self.view().back_target() {
                    if target != self.view() {
                        self.navigate(target);
                    }
                }
                return;
            }
            _ => {}
        }

        match self.view() {
            View::Login => self.dispatch_login(action),
            View::Dashboard => self.dispatch_dashboard(action),
            View::IceBreaker => self.dispatch_ice_breaker(action),
            View::ChatAnalyzer => self.dispatch_chat_analyzer(action),
            View::MoreOptions => self.dispatch_more_options(action),
        }
    }

    fn dispatch_login(&mut self, action: Action) {
        if action == Action::Confirm {
            self.navigate(View::Dashboard);
        }
    }

    fn dispatch_dashboard(&mut self, action: Action) {
        let Screen::Dashboard(state) = &mut self.ui.screen else {
            return;
        };
        match action {
            Action::Open(view) if MENU_VIEWS.contains(&view) => self.navigate(view),
            Action::MenuUp => {
                state.selection = (state.selection + MENU_VIEWS.len() - 1) % MENU_VIEWS.len();
            }
            Action::MenuDown => {
                state.selection = (state.selection + 1) % MENU_VIEWS.len();
            }
            Action::OpenSelected => {
                let view = MENU_VIEWS[state.selection % MENU_VIEWS.len()];
                self.navigate(view);
            }
            _ => {}
        }
    }

    fn dispatch_ice_breaker(&mut self, action: Action) {
        let Screen::IceBreaker(state) = &mut self.ui.screen else {
            return;
        };
        match action {
            Action::Generate => {
                if state.loading {
                    return;
                }
                state.loading = true;
                state.lines.clear();
                state.selected = 0;
                state.copied = None;

                let generator = self.generator.clone();
                let tx = self.task_tx.clone();
                let mount_id = self.ui.mount_id;
                tokio::spawn(async move {
                    let lines = generator.generate_ice_breakers().await;
                    let _ = tx.send(TaskMessage::IceBreakers { mount_id, lines });
                });
            }
            Action::SelectNext => {
                if !state.lines.is_empty() {
                    state.selected = (state.selected + 1).min(state.lines.len() - 1);
                }
            }
            Action::SelectPrev => {
                state.selected = state.selected.saturating_sub(1);
            }
            Action::CopySelected => {
                let index = state.selected;
                self.dispatch_ice_breaker(Action::Copy(index));
            }
            Action::Copy(index) => {
                let Some(text) = state.lines.get(index).cloned() else {
                    return;
                };
                match self.clipboard.copy(&text) {
                    Ok(()) => {
                        state.copied = Some(CopyFlash {
                            index,
                            expires_at: self.animation_tick + self.config.copy_flash_ticks(),
                        });
                    }
                    Err(e) => {
                        log::warn!("Clipboard copy failed: {}", e);
                        self.set_status(format!("No se pudo copiar: {}", e));
                    }
                }
            }
            _ => {}
        }
    }

    fn dispatch_chat_analyzer(&mut self, action: Action) {
        let Screen::ChatAnalyzer(state) = &mut self.ui.screen else {
            return;
        };
        match action {
            Action::Generate => {
                if state.loading || state.attaching {
                    return;
                }
                let Some(image) = state.image.clone() else {
                    self.set_status("Sube una captura primero: /open <ruta>");
                    return;
                };
                state.loading = true;
                state.reply.clear();
                state.copied = None;

                let tone = state.tone;
                let generator = self.generator.clone();
                let tx = self.task_tx.clone();
                let mount_id = self.ui.mount_id;
                tokio::spawn(async move {
                    let reply = generator.generate_chat_reply(&image, tone).await;
                    let _ = tx.send(TaskMessage::ChatReply { mount_id, reply });
                });
            }
            Action::ToneUp => {
                state.tone = state.tone.saturating_add(self.config.tone_step).min(100);
            }
            Action::ToneDown => {
                state.tone = state.tone.saturating_sub(self.config.tone_step);
            }
            Action::SetTone(tone) => {
                state.tone = tone.min(100);
            }
            Action::AttachImage(path) => {
                if state.attaching {
                    return;
                }
                state.attaching = true;

                // Reading and encoding a large screenshot would stall drawing
                let tx = self.task_tx.clone();
                let mount_id = self.ui.mount_id;
                tokio::task::spawn_blocking(move || {
                    let result = ImageAttachment::load(&path);
                    let _ = tx.send(TaskMessage::Attached { mount_id, path, result });
                });
            }
            Action::CopyReply => {
                if state.reply.is_empty() {
                    return;
                }
                let reply = state.reply.clone();
                match self.clipboard.copy(&reply) {
                    Ok(()) => {
                        state.copied = Some(CopyFlash {
                            index: 0,
                            expires_at: self.animation_tick + self.config.copy_flash_ticks(),
                        });
                    }
                    Err(e) => {
                        log::warn!("Clipboard copy failed: {}", e);
                        self.set_status(format!("No se pudo copiar: {}", e));
                    }
                }
            }
            Action::InputChar(c) => state.input.push(c),
            Action::InputBackspace => {
                state.input.pop();
            }
            Action::InputPaste(text) => {
                let filtered: String = text
                    .chars()
                    .filter(|c| *c != '\r')
                    .map(|c| if c == '\n' { ' ' } else { c })
                    .collect();
                state.input.push_str(&filtered);
            }
            Action::InputClear => state.input.clear(),
            Action::SubmitInput => {
                let line = std::mem::take(&mut state.input);
                if line.trim().is_empty() {
                    self.dispatch(Action::Generate);
                    return;
                }
                match CommandParser::parse(&line) {
                    // Keep the command line from recursing into itself
                    Ok(Action::SubmitInput) => {}
                    Ok(next) => self.dispatch(next),
                    Err(message) => self.set_status(message),
                }
            }
            _ => {}
        }
    }

    fn dispatch_more_options(&mut self, action: Action) {
        let Screen::MoreOptions(state) = &mut self.ui.screen else {
            return;
        };
        match action {
            Action::RequestReset => state.confirming_reset = true,
            Action::CancelReset => state.confirming_reset = false,
            Action::ConfirmReset => {
                if !state.confirming_reset {
                    return;
                }
                state.confirming_reset = false;
                self.stats = Stats::default();
                self.counters.save(&self.stats);
                log::info!("Stats reset");
                self.set_status("Estadísticas reiniciadas");
            }
            _ => {}
        }
    }

    /// Apply every finished task. Returns how many were applied.
    pub fn poll_tasks(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(message) = self.task_rx.try_recv() {
            self.apply_task(message);
            applied += 1;
        }
        applied
    }

    /// Wait for the next finished task and apply it.
    #[cfg(test)]
    pub async fn wait_for_task(&mut self) {
        if let Some(message) = self.task_rx.recv().await {
            self.apply_task(message);
        }
    }

    fn apply_task(&mut self, message: TaskMessage) {
        match message {
            TaskMessage::IceBreakers { mount_id, lines } => {
                let counted = lines
                    .first()
                    .map_or(false, |line| !line.starts_with(APOLOGY_PREFIX));

                match &mut self.ui.screen {
                    Screen::IceBreaker(state) if mount_id == self.ui.mount_id => {
                        state.lines = lines;
                        state.loading = false;
                    }
                    _ => log::debug!("Dropping ice breakers for unmounted screen {}", mount_id),
                }

                if counted {
                    self.stats.generated += 1;
                    self.counters.save(&self.stats);
                }
            }
            TaskMessage::ChatReply { mount_id, reply } => {
                match &mut self.ui.screen {
                    Screen::ChatAnalyzer(state) if mount_id == self.ui.mount_id => {
                        state.reply = reply;
                        state.loading = false;
                    }
                    _ => log::debug!("Dropping chat reply for unmounted screen {}", mount_id),
                }

                // Counted even when the reply is the fallback line
                self.stats.analyzed += 1;
                self.counters.save(&self.stats);
            }
            TaskMessage::Attached { mount_id, path, result } => {
                let Screen::ChatAnalyzer(state) = &mut self.ui.screen else {
                    log::debug!("Dropping attachment for unmounted screen {}", mount_id);
                    return;
                };
                if mount_id != self.ui.mount_id {
                    log::debug!("Dropping attachment for unmounted screen {}", mount_id);
                    return;
                }
                state.attaching = false;

                match result {
                    Ok(image) => {
                        let message = format!("Imagen cargada: {}", image.file_name);
                        log::info!("Attached {} ({})", image.path.display(), image.mime_type);
                        state.image = Some(image);
                        state.reply.clear();
                        state.copied = None;
                        self.set_status(message);
                    }
                    Err(e) => {
                        log::warn!("Could not attach {}: {}", path, e);
                        self.set_status(e.to_string());
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;

    use super::*;
    use crate::clipboard::testing::RecordingClipboard;
    use crate::generation::testing::ScriptedModel;
    use crate::prompts::{GENERATION_FALLBACK, REPLY_FALLBACK};
    use crate::stats::memory::MemoryStore;
    use crate::stats::{KeyValueStore, STATS_KEY};

    const FIVE_LINES: &str = r#"{"ice_breakers": ["a", "b", "c", "d", "e"]}"#;

    struct Harness {
        app: App,
        store: Arc<MemoryStore>,
        model: Arc<ScriptedModel>,
        clipboard: RecordingClipboard,
    }

    fn harness() -> Harness {
        harness_with(Arc::new(MemoryStore::new()), RecordingClipboard::default())
    }

    fn harness_with(store: Arc<MemoryStore>, clipboard: RecordingClipboard) -> Harness {
        let model = Arc::new(ScriptedModel::new());
        let app = App::new(
            Config::default(),
            CounterStore::new(Box::new(Arc::clone(&store))),
            Generator::new(Arc::clone(&model) as Arc<dyn crate::gemini::GenerativeModel>),
            Box::new(clipboard.clone()),
        );
        Harness {
            app,
            store,
            model,
            clipboard,
        }
    }

    fn persisted(store: &MemoryStore) -> Stats {
        let raw = store.get(STATS_KEY).unwrap().expect("stats were persisted");
        serde_json::from_str(&raw).unwrap()
    }

    async fn analyzer_with_image(h: &mut Harness, dir: &tempfile::TempDir) {
        let path = dir.path().join("chat.png");
        fs::write(&path, b"png").unwrap();
        h.app.dispatch(Action::Confirm);
        h.app.dispatch(Action::Open(View::ChatAnalyzer));
        h.app.dispatch(Action::AttachImage(path.display().to_string()));
        h.app.wait_for_task().await;
    }

    #[test]
    fn starts_on_login_and_only_confirm_leaves_it() {
        let mut h = harness();
        assert_eq!(h.app.view(), View::Login);

        h.app.dispatch(Action::Back);
        h.app.dispatch(Action::Open(View::IceBreaker));
        h.app.dispatch(Action::Generate);
        assert_eq!(h.app.view(), View::Login);

        h.app.dispatch(Action::Confirm);
        assert_eq!(h.app.view(), View::Dashboard);
    }

    #[test]
    fn dashboard_opens_each_screen_and_back_returns() {
        let mut h = harness();
        h.app.dispatch(Action::Confirm);

        for view in MENU_VIEWS {
            h.app.dispatch(Action::Open(view));
            assert_eq!(h.app.view(), view);
            h.app.dispatch(Action::Back);
            assert_eq!(h.app.view(), View::Dashboard);
        }

        h.app.dispatch(Action::Open(View::Login));
        assert_eq!(h.app.view(), View::Dashboard);
        h.app.dispatch(Action::Back);
        assert_eq!(h.app.view(), View::Dashboard);
    }

    #[test]
    fn menu_selection_wraps() {
        let mut h = harness();
        h.app.dispatch(Action::Confirm);
        h.app.dispatch(Action::MenuUp);
        h.app.dispatch(Action::OpenSelected);
        assert_eq!(h.app.view(), View::MoreOptions);

        h.app.dispatch(Action::Back);
        h.app.dispatch(Action::MenuDown);
        h.app.dispatch(Action::OpenSelected);
        assert_eq!(h.app.view(), View::ChatAnalyzer);
    }

    #[test]
    fn stats_load_from_storage_at_start() {
        let store = Arc::new(MemoryStore::new());
        store.set(STATS_KEY, r#"{"analyzed":3,"generated":9}"#).unwrap();
        let h = harness_with(store, RecordingClipboard::default());
        assert_eq!(h.app.stats, Stats { analyzed: 3, generated: 9 });
    }

    #[tokio::test]
    async fn fresh_install_ice_breakers_count_once() {
        let mut h = harness();
        assert_eq!(h.app.stats, Stats::default());
        h.model.push_ok(FIVE_LINES);

        h.app.dispatch(Action::Confirm);
        h.app.dispatch(Action::Open(View::IceBreaker));
        h.app.dispatch(Action::Generate);
        match &h.app.ui.screen {
            Screen::IceBreaker(state) => assert!(state.loading),
            other => panic!("unexpected screen {:?}", other),
        }

        h.app.wait_for_task().await;

        match &h.app.ui.screen {
            Screen::IceBreaker(state) => {
                assert!(!state.loading);
                assert_eq!(state.lines, vec!["a", "b", "c", "d", "e"]);
            }
            other => panic!("unexpected screen {:?}", other),
        }
        assert_eq!(h.app.stats, Stats { analyzed: 0, generated: 1 });
        assert_eq!(persisted(&h.store), Stats { analyzed: 0, generated: 1 });
    }

    #[tokio::test]
    async fn ice_breaker_fallback_is_not_counted() {
        let mut h = harness();
        h.model.push_err(crate::error::GenerationError::EmptyResponse);

        h.app.dispatch(Action::Confirm);
        h.app.dispatch(Action::Open(View::IceBreaker));
        h.app.dispatch(Action::Generate);
        h.app.wait_for_task().await;

        match &h.app.ui.screen {
            Screen::IceBreaker(state) => assert_eq!(state.lines, vec![GENERATION_FALLBACK]),
            other => panic!("unexpected screen {:?}", other),
        }
        assert_eq!(h.app.stats.generated, 0);
        assert_eq!(h.store.get(STATS_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn generate_is_ignored_while_loading() {
        let mut h = harness();
        h.model.push_ok(FIVE_LINES);
        h.model.push_ok(FIVE_LINES);

        h.app.dispatch(Action::Confirm);
        h.app.dispatch(Action::Open(View::IceBreaker));
        h.app.dispatch(Action::Generate);
        h.app.dispatch(Action::Generate);
        h.app.wait_for_task().await;

        tokio::task::yield_now().await;
        assert_eq!(h.app.poll_tasks(), 0);
        assert_eq!(h.model.requests.lock().unwrap().len(), 1);
        assert_eq!(h.app.stats.generated, 1);
    }

    #[tokio::test]
    async fn failed_chat_analysis_still_counts() {
        let tmp = tempfile::tempdir().unwrap();
        let mut h = harness();
        h.model.push_err(crate::error::GenerationError::Api {
            status: 500,
            message: "boom".to_string(),
        });
        analyzer_with_image(&mut h, &tmp).await;

        h.app.dispatch(Action::Generate);
        h.app.wait_for_task().await;

        match &h.app.ui.screen {
            Screen::ChatAnalyzer(state) => {
                assert_eq!(state.reply, REPLY_FALLBACK);
                assert!(!state.loading);
            }
            other => panic!("unexpected screen {:?}", other),
        }
        assert_eq!(h.app.stats, Stats { analyzed: 1, generated: 0 });
        assert_eq!(persisted(&h.store), Stats { analyzed: 1, generated: 0 });
    }

    #[tokio::test]
    async fn chat_reply_uses_current_tone() {
        let tmp = tempfile::tempdir().unwrap();
        let mut h = harness();
        h.model.push_ok("\"claro que sí\"");
        analyzer_with_image(&mut h, &tmp).await;

        h.app.dispatch(Action::SetTone(10));
        h.app.dispatch(Action::Generate);
        h.app.wait_for_task().await;

        match &h.app.ui.screen {
            Screen::ChatAnalyzer(state) => assert_eq!(state.reply, "claro que sí"),
            other => panic!("unexpected screen {:?}", other),
        }
        let requests = h.model.requests.lock().unwrap();
        assert!(requests[0]
            .prompt
            .contains(crate::generation::tone_to_description(10)));
        assert_eq!(requests[0].image.as_ref().unwrap().data, "cG5n");
    }

    #[test]
    fn analyzer_generate_without_image_does_nothing() {
        let mut h = harness();
        h.app.dispatch(Action::Confirm);
        h.app.dispatch(Action::Open(View::ChatAnalyzer));
        h.app.dispatch(Action::Generate);

        match &h.app.ui.screen {
            Screen::ChatAnalyzer(state) => assert!(!state.loading),
            other => panic!("unexpected screen {:?}", other),
        }
        assert!(h.app.ui.status_message.is_some());
        assert!(h.model.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn bad_attachment_keeps_previous_image() {
        let tmp = tempfile::tempdir().unwrap();
        let mut h = harness();
        analyzer_with_image(&mut h, &tmp).await;

        h.app.dispatch(Action::AttachImage(
            tmp.path().join("missing.png").display().to_string(),
        ));
        h.app.wait_for_task().await;
        match &h.app.ui.screen {
            Screen::ChatAnalyzer(state) => {
                assert_eq!(state.image.as_ref().unwrap().file_name, "chat.png")
            }
            other => panic!("unexpected screen {:?}", other),
        }
        assert!(h.app.ui.status_message.is_some());
    }

    #[tokio::test]
    async fn result_after_navigation_is_dropped_but_counted() {
        let mut h = harness();
        h.model.push_ok(FIVE_LINES);

        h.app.dispatch(Action::Confirm);
        h.app.dispatch(Action::Open(View::IceBreaker));
        h.app.dispatch(Action::Generate);
        h.app.dispatch(Action::Back);
        h.app.dispatch(Action::Open(View::IceBreaker));
        h.app.wait_for_task().await;

        match &h.app.ui.screen {
            Screen::IceBreaker(state) => {
                assert!(state.lines.is_empty());
                assert!(!state.loading);
            }
            other => panic!("unexpected screen {:?}", other),
        }
        assert_eq!(h.app.stats.generated, 1);
    }

    #[tokio::test]
    async fn chat_reply_after_navigation_is_dropped_but_counted() {
        let tmp = tempfile::tempdir().unwrap();
        let mut h = harness();
        h.model.push_ok("hola, ¿qué tal?");
        analyzer_with_image(&mut h, &tmp).await;

        h.app.dispatch(Action::Generate);
        h.app.dispatch(Action::Back);
        h.app.dispatch(Action::Open(View::ChatAnalyzer));
        h.app.wait_for_task().await;

        match &h.app.ui.screen {
            Screen::ChatAnalyzer(state) => {
                assert!(state.reply.is_empty());
                assert!(!state.loading);
                assert!(state.image.is_none());
            }
            other => panic!("unexpected screen {:?}", other),
        }
        assert_eq!(h.app.stats.analyzed, 1);
        assert_eq!(persisted(&h.store), Stats { analyzed: 1, generated: 0 });
    }

    #[tokio::test]
    async fn attachment_loads_off_the_main_loop() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("chat.png");
        fs::write(&path, b"png").unwrap();
        let mut h = harness();
        h.model.push_ok("hola");
        h.app.dispatch(Action::Confirm);
        h.app.dispatch(Action::Open(View::ChatAnalyzer));

        h.app.dispatch(Action::AttachImage(path.display().to_string()));
        match &h.app.ui.screen {
            Screen::ChatAnalyzer(state) => {
                assert!(state.attaching);
                assert!(state.image.is_none());
            }
            other => panic!("unexpected screen {:?}", other),
        }

        // Nothing to send until the image has arrived
        h.app.dispatch(Action::Generate);
        assert!(h.model.requests.lock().unwrap().is_empty());

        h.app.wait_for_task().await;
        match &h.app.ui.screen {
            Screen::ChatAnalyzer(state) => {
                assert!(!state.attaching);
                assert_eq!(state.image.as_ref().unwrap().file_name, "chat.png");
            }
            other => panic!("unexpected screen {:?}", other),
        }
    }

    #[tokio::test]
    async fn attachment_for_a_left_screen_is_dropped() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("chat.png");
        fs::write(&path, b"png").unwrap();
        let mut h = harness();
        h.app.dispatch(Action::Confirm);
        h.app.dispatch(Action::Open(View::ChatAnalyzer));

        h.app.dispatch(Action::AttachImage(path.display().to_string()));
        h.app.dispatch(Action::Back);
        h.app.dispatch(Action::Open(View::ChatAnalyzer));
        h.app.wait_for_task().await;

        match &h.app.ui.screen {
            Screen::ChatAnalyzer(state) => {
                assert!(state.image.is_none());
                assert!(!state.attaching);
            }
            other => panic!("unexpected screen {:?}", other),
        }
    }

    #[test]
    fn reset_cancel_then_confirm() {
        let store = Arc::new(MemoryStore::new());
        store.set(STATS_KEY, r#"{"analyzed":4,"generated":2}"#).unwrap();
        let mut h = harness_with(store, RecordingClipboard::default());

        h.app.dispatch(Action::Confirm);
        h.app.dispatch(Action::Open(View::MoreOptions));

        h.app.dispatch(Action::RequestReset);
        h.app.dispatch(Action::CancelReset);
        assert_eq!(h.app.stats, Stats { analyzed: 4, generated: 2 });

        // Confirm without a pending request does nothing
        h.app.dispatch(Action::ConfirmReset);
        assert_eq!(h.app.stats, Stats { analyzed: 4, generated: 2 });

        h.app.dispatch(Action::RequestReset);
        h.app.dispatch(Action::ConfirmReset);
        assert_eq!(h.app.stats, Stats::default());
        assert_eq!(persisted(&h.store), Stats::default());

        h.app.dispatch(Action::RequestReset);
        h.app.dispatch(Action::ConfirmReset);
        assert_eq!(h.app.stats, Stats::default());
        match &h.app.ui.screen {
            Screen::MoreOptions(state) => assert!(!state.confirming_reset),
            other => panic!("unexpected screen {:?}", other),
        }
    }

    #[test]
    fn reset_survives_unavailable_storage() {
        let store = Arc::new(MemoryStore::new());
        store.set(STATS_KEY, r#"{"analyzed":1,"generated":1}"#).unwrap();
        let mut h = harness_with(Arc::clone(&store), RecordingClipboard::default());
        store.set_failing(true);

        h.app.dispatch(Action::Confirm);
        h.app.dispatch(Action::Open(View::MoreOptions));
        h.app.dispatch(Action::RequestReset);
        h.app.dispatch(Action::ConfirmReset);
        assert_eq!(h.app.stats, Stats::default());
    }

    #[tokio::test]
    async fn copy_flash_expires_and_dies_with_screen() {
        let mut h = harness();
        h.model.push_ok(FIVE_LINES);
        h.app.dispatch(Action::Confirm);
        h.app.dispatch(Action::Open(View::IceBreaker));
        h.app.dispatch(Action::Generate);
        h.app.wait_for_task().await;

        h.app.dispatch(Action::SelectNext);
        h.app.dispatch(Action::CopySelected);
        assert_eq!(*h.clipboard.copied.lock().unwrap(), vec!["b".to_string()]);

        let flash_ticks = h.app.config.copy_flash_ticks();
        for _ in 0..flash_ticks - 1 {
            h.app.tick();
        }
        match &h.app.ui.screen {
            Screen::IceBreaker(state) => assert_eq!(state.copied.map(|f| f.index), Some(1)),
            other => panic!("unexpected screen {:?}", other),
        }
        h.app.tick();
        match &h.app.ui.screen {
            Screen::IceBreaker(state) => assert!(state.copied.is_none()),
            other => panic!("unexpected screen {:?}", other),
        }

        h.app.dispatch(Action::Copy(0));
        h.app.dispatch(Action::Back);
        h.app.dispatch(Action::Open(View::IceBreaker));
        match &h.app.ui.screen {
            Screen::IceBreaker(state) => {
                assert!(state.copied.is_none());
                assert!(state.lines.is_empty());
            }
            other => panic!("unexpected screen {:?}", other),
        }
    }

    #[tokio::test]
    async fn clipboard_failure_reports_status() {
        let clipboard = RecordingClipboard {
            fail: true,
            ..Default::default()
        };
        let tmp = tempfile::tempdir().unwrap();
        let mut h = harness_with(Arc::new(MemoryStore::new()), clipboard);
        analyzer_with_image(&mut h, &tmp).await;
        if let Screen::ChatAnalyzer(state) = &mut h.app.ui.screen {
            state.reply = "hola".to_string();
        }

        h.app.dispatch(Action::CopyReply);
        assert!(h
            .app
            .ui
            .status_message
            .as_deref()
            .unwrap()
            .starts_with("No se pudo copiar"));
        match &h.app.ui.screen {
            Screen::ChatAnalyzer(state) => assert!(state.copied.is_none()),
            other => panic!("unexpected screen {:?}", other),
        }
    }

    #[test]
    fn tone_steps_clamp() {
        let mut h = harness();
        h.app.dispatch(Action::Confirm);
        h.app.dispatch(Action::Open(View::ChatAnalyzer));

        for _ in 0..30 {
            h.app.dispatch(Action::ToneUp);
        }
        let tone = |app: &App| match &app.ui.screen {
            Screen::ChatAnalyzer(state) => state.tone,
            _ => unreachable!(),
        };
        assert_eq!(tone(&h.app), 100);

        for _ in 0..30 {
            h.app.dispatch(Action::ToneDown);
        }
        assert_eq!(tone(&h.app), 0);
    }

    #[tokio::test]
    async fn command_line_drives_the_analyzer() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("shot.webp");
        fs::write(&path, b"webp").unwrap();

        let mut h = harness();
        h.app.dispatch(Action::Confirm);
        h.app.dispatch(Action::Open(View::ChatAnalyzer));

        h.app.dispatch(Action::InputPaste(format!("/open {}\n", path.display())));
        h.app.dispatch(Action::SubmitInput);
        h.app.wait_for_task().await;
        h.app.dispatch(Action::InputPaste("/tone 85".to_string()));
        h.app.dispatch(Action::SubmitInput);
        h.app.dispatch(Action::InputPaste("/bogus".to_string()));
        h.app.dispatch(Action::SubmitInput);

        match &h.app.ui.screen {
            Screen::ChatAnalyzer(state) => {
                assert_eq!(state.image.as_ref().unwrap().mime_type, "image/webp");
                assert_eq!(state.tone, 85);
                assert!(state.input.is_empty());
            }
            other => panic!("unexpected screen {:?}", other),
        }
        assert!(h.app.ui.status_message.as_deref().unwrap().contains("/bogus"));
    }

    #[test]
    fn stat_count_up_reaches_value() {
        let store = Arc::new(MemoryStore::new());
        store.set(STATS_KEY, r#"{"analyzed":10,"generated":0}"#).unwrap();
        let mut h = harness_with(store, RecordingClipboard::default());
        h.app.dispatch(Action::Confirm);

        assert_eq!(h.app.animated_stat(10), 0);
        let duration = h.app.config.stat_animation_ticks();
        for _ in 0..duration / 2 {
            h.app.tick();
        }
        let halfway = h.app.animated_stat(10);
        assert!(halfway > 0 && halfway < 10, "halfway {}", halfway);
        for _ in 0..duration {
            h.app.tick();
        }
        assert_eq!(h.app.animated_stat(10), 10);
    }

    #[test]
    fn status_message_expires() {
        let mut h = harness();
        h.app.set_status("hola");
        for _ in 0..h.app.config.status_timeout_ticks {
            h.app.tick();
        }
        assert!(h.app.ui.status_message.is_none());
    }

    #[test]
    fn quit_sets_flag_from_any_screen() {
        let mut h = harness();
        h.app.dispatch(Action::Quit);
        assert!(h.app.should_quit);
    }
}
