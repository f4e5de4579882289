// Shell - the live page state
//
// This is the persistent document the router splices fragments into: the
// title, the main-content region, and everything derived from the mounted
// fragment (form bindings, nav toggle, success banner). The engine is the
// only mutator, so none of this needs locking.

use crate::form::{Field, FormState};
use crate::fragment::Fragment;
use crate::template;
use std::collections::HashMap;

/// Mobile-nav toggle: one boolean, mirrored into an accessibility attribute
#[derive(Debug, Clone, Copy, Default)]
pub struct NavToggle {
    pub expanded: bool,
}

impl NavToggle {
    /// Flip the toggle; the mobile panel shows exactly when expanded
    pub fn flip(&mut self) -> bool {
        self.expanded = !self.expanded;
        self.expanded
    }

    /// Value for the aria-expanded attribute
    pub fn aria_expanded(&self) -> &'static str {
        if self.expanded {
            "true"
        } else {
            "false"
        }
    }
}

/// Success-message region with a generation-guarded auto-hide.
///
/// Each show bumps the generation; an expiry for an older generation is a
/// stale timer from a previous submission and is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuccessBanner {
    visible: bool,
    generation: u64,
}

impl SuccessBanner {
    pub fn show(&mut self) -> u64 {
        self.visible = true;
        self.generation += 1;
        self.generation
    }

    pub fn expire(&mut self, generation: u64) {
        if generation == self.generation {
            self.visible = false;
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

/// The live document model
pub struct Shell {
    /// Current document title
    pub title: String,
    /// Inner HTML of the live main-content region
    main_html: String,
    /// The fragment currently mounted, kept so enhancement can re-derive
    /// bindings without refetching
    content: Option<Fragment>,
    form: Option<FormState>,
    nav: Option<NavToggle>,
    banner: SuccessBanner,
    focused: Option<Field>,
}

impl Shell {
    /// The boot shell, before any fragment has been mounted
    pub fn new() -> Self {
        Self {
            title: String::new(),
            main_html: String::new(),
            content: None,
            form: None,
            nav: None,
            banner: SuccessBanner::default(),
            focused: None,
        }
    }

    /// Splice a fetched fragment into the live region.
    ///
    /// The fragment's content passes through template substitution (with an
    /// empty map today), the title updates when the fragment carries one,
    /// and all fragment-derived state starts over: the swap mounted a fresh
    /// subtree, so old bindings, markers, and focus no longer apply.
    pub fn swap(&mut self, fragment: Fragment) {
        self.main_html = template::render(&fragment.main_html, &HashMap::new());
        if let Some(title) = &fragment.title {
            self.title = title.clone();
        }
        self.content = Some(fragment);
        self.form = None;
        self.nav = None;
        self.banner = SuccessBanner::default();
        self.focused = None;
        self.enhance();
    }

    /// Re-derive bindings from the mounted content.
    ///
    /// Idempotent and safe on any state: bindings that already exist are
    /// kept (re-running this must not clobber user-entered values), and
    /// absent elements simply produce no binding.
    pub fn enhance(&mut self) {
        let Some(content) = &self.content else {
            return;
        };
        if self.form.is_none() {
            if let Some(descriptor) = &content.form {
                self.form = Some(FormState::bind(descriptor.clone()));
            }
        }
        if self.nav.is_none() && content.has_nav_toggle {
            self.nav = Some(NavToggle::default());
        }
    }

    /// Resolve the form a submit event targets. An event that did not come
    /// from inside a form falls back to the registration form, which is the
    /// only form the shell mounts anyway.
    pub fn resolve_form(&mut self, _target: Option<&str>) -> Option<&mut FormState> {
        self.form.as_mut()
    }

    pub fn form(&self) -> Option<&FormState> {
        self.form.as_ref()
    }

    /// A user edit on a control: store the value and drop that field's
    /// error marker
    pub fn edit_field(&mut self, element_id: &str, value: &str) {
        let Some(form) = self.form.as_mut() else {
            tracing::debug!("edit on {element_id} ignored: no form mounted");
            return;
        };
        if !form.set_value(element_id, value) {
            tracing::debug!("edit on {element_id} ignored: no such control");
            return;
        }
        if let Some(field) = Field::from_element_id(element_id) {
            form.clear_marker(field);
        }
    }

    /// Flip the mobile-nav toggle, if the toggle pair is mounted
    pub fn toggle_nav(&mut self) -> Option<bool> {
        let nav = self.nav.as_mut()?;
        let expanded = nav.flip();
        tracing::debug!(aria_expanded = nav.aria_expanded(), "mobile nav toggled");
        Some(expanded)
    }

    pub fn nav(&self) -> Option<&NavToggle> {
        self.nav.as_ref()
    }

    /// Move focus to a field and bring it to the middle of the viewport
    pub fn focus(&mut self, field: Field) {
        self.focused = Some(field);
        tracing::debug!("focusing #{field}, smooth-scrolled to viewport center");
    }

    pub fn focused(&self) -> Option<Field> {
        self.focused
    }

    /// Reveal the success region. Returns the banner generation for the
    /// auto-hide timer, or None when the mounted fragment has no region to
    /// reveal.
    pub fn show_success(&mut self) -> Option<u64> {
        match &self.content {
            Some(content) if content.has_success_region => Some(self.banner.show()),
            _ => None,
        }
    }

    pub fn expire_success(&mut self, generation: u64) {
        self.banner.expire(generation);
    }

    pub fn success_visible(&self) -> bool {
        self.banner.is_visible()
    }

    pub fn main_html(&self) -> &str {
        &self.main_html
    }

    /// Human-readable state dump for the driver's `show` command
    pub fn describe(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("title: {}\n", self.title));
        out.push_str(&format!("main: {} bytes\n", self.main_html().len()));
        if let Some(nav) = self.nav() {
            out.push_str(&format!("nav expanded: {}\n", nav.expanded));
        }
        if self.success_visible() {
            out.push_str("success message: visible\n");
        }
        if let Some(form) = self.form() {
            out.push_str("form:\n");
            for field in Field::ALL {
                if let Some(value) = form.value_of(field.element_id()) {
                    out.push_str(&format!("  {field}: {value:?}\n"));
                }
            }
            for marker in form.markers() {
                out.push_str(&format!("  ! {}: {}\n", marker.field, marker.message));
            }
        }
        if let Some(field) = self.focused() {
            out.push_str(&format!("focused: {field}\n"));
        }
        out
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}
