use crate::image::ImageAttachment;

/// Which screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Login,
    Dashboard,
    IceBreaker,
    ChatAnalyzer,
    MoreOptions,
}

impl View {
    /// Where "back" goes. Login has nowhere to go back to.
    pub fn back_target(self) -> Option<View> {
        match self {
            View::Login => None,
            _ => Some(View::Dashboard),
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            View::Login => "Flechazo AI",
            View::Dashboard => "Flechazo AI",
            View::IceBreaker => "Generador de Flechazos",
            View::ChatAnalyzer => "Analizador de Chat",
            View::MoreOptions => "Más Opciones",
        }
    }
}

/// Dashboard menu order
pub const MENU_VIEWS: [View; 3] = [View::IceBreaker, View::ChatAnalyzer, View::MoreOptions];

/// A "¡Copiado!" badge that disappears at `expires_at` (animation tick).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyFlash {
    pub index: usize,
    pub expires_at: u64,
}

#[derive(Debug, Default)]
pub struct DashboardState {
    pub selection: usize,
    /// Tick the dashboard was shown at; drives the stat count-up
    pub shown_at: u64,
}

#[derive(Debug, Default)]
pub struct IceBreakerState {
    pub lines: Vec<String>,
    pub loading: bool,
    pub selected: usize,
    pub copied: Option<CopyFlash>,
}

#[derive(Debug)]
pub struct ChatAnalyzerState {
    pub image: Option<ImageAttachment>,
    pub tone: u8,
    pub reply: String,
    pub loading: bool,
    /// A screenshot is being read in the background
    pub attaching: bool,
    pub copied: Option<CopyFlash>,
    /// Command line for `/open <path>` and `/tone <n>`
    pub input: String,
}

impl Default for ChatAnalyzerState {
    fn default() -> Self {
        Self {
            image: None,
            tone: 50,
            reply: String::new(),
            loading: false,
            attaching: false,
            copied: None,
            input: String::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct MoreOptionsState {
    pub confirming_reset: bool,
}

/// The current screen together with its local state. Replacing it on
/// navigation is what drops the previous screen's state.
#[derive(Debug)]
pub enum Screen {
    Login,
    Dashboard(DashboardState),
    IceBreaker(IceBreakerState),
    ChatAnalyzer(ChatAnalyzerState),
    MoreOptions(MoreOptionsState),
}

impl Default for Screen {
    fn default() -> Self {
        Screen::Login
    }
}

impl Screen {
    /// Fresh local state for `view`, mounted at animation tick `now`.
    pub fn mount(view: View, now: u64) -> Self {
        match view {
            View::Login => Screen::Login,
            View::Dashboard => Screen::Dashboard(DashboardState {
                selection: 0,
                shown_at: now,
            }),
            View::IceBreaker => Screen::IceBreaker(IceBreakerState::default()),
            View::ChatAnalyzer => Screen::ChatAnalyzer(ChatAnalyzerState::default()),
            View::MoreOptions => Screen::MoreOptions(MoreOptionsState::default()),
        }
    }

    pub fn view(&self) -> View {
        match self {
            Screen::Login => View::Login,
            Screen::Dashboard(_) => View::Dashboard,
            Screen::IceBreaker(_) => View::IceBreaker,
            Screen::ChatAnalyzer(_) => View::ChatAnalyzer,
            Screen::MoreOptions(_) => View::MoreOptions,
        }
    }
}

#[derive(Debug, Default)]
pub struct UIState {
    pub screen: Screen,
    /// Bumped on every navigation; async results carry the id they started under
    pub mount_id: u64,
    pub status_message: Option<String>,
    pub status_expires_at: u64,
}

impl UIState {
    pub fn new() -> Self {
        Self::default()
    }
}
