use crate::ui_state::View;

/// User actions that can be triggered by key events or analyzer commands.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Leave the login screen
    Confirm,
    /// Open a screen from the dashboard
    Open(View),
    /// Move the dashboard menu highlight
    MenuUp,
    MenuDown,
    /// Open the highlighted dashboard entry
    OpenSelected,
    /// Return to the dashboard
    Back,
    /// Ask the model for ice breakers or a chat reply, depending on the screen
    Generate,
    /// Move the ice-breaker highlight
    SelectNext,
    SelectPrev,
    /// Copy the nth ice breaker
    Copy(usize),
    /// Copy the highlighted ice breaker
    CopySelected,
    /// Copy the suggested chat reply
    CopyReply,
    ToneUp,
    ToneDown,
    SetTone(u8),
    /// Load a screenshot from a path
    AttachImage(String),
    /// Analyzer command-line editing
    InputChar(char),
    InputBackspace,
    InputPaste(String),
    InputClear,
    SubmitInput,
    /// Show the reset confirmation
    RequestReset,
    CancelReset,
    ConfirmReset,
    Quit,
}
