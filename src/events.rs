// Events that flow from the driver and background tasks into the engine
//
// Everything the page reacts to is one of these variants. A single mpsc
// channel feeds the engine loop, so user interaction, fetch completions,
// and timers all converge on one dispatch path.

use crate::fragment::Fragment;

/// Main event type that flows through the application
#[derive(Debug)]
pub enum UiEvent {
    /// The address hash changed (direct edit or initial load)
    HashChanged { hash: String },

    /// An anchor was clicked; `href` is the anchor's href attribute
    LinkClicked { href: String },

    /// A user edit on a form control
    FieldEdited { element_id: String, value: String },

    /// The hamburger was pressed
    NavTogglePressed,

    /// A form submit was requested. `target` is the id of the element the
    /// event came from, when it came from inside a form.
    SubmitRequested { target: Option<String> },

    /// A fragment fetch finished. `seq` orders completions against newer
    /// navigations.
    FragmentLoaded { seq: u64, fragment: Fragment },

    /// The success region's auto-hide timer fired
    SuccessExpired { generation: u64 },

    /// Dump the shell state to stdout (driver `show` command)
    PrintState,

    /// Shut the engine down
    Quit,
}
