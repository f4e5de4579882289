// Fragment parsing - extracts the pieces the shell cares about from a
// fetched page document
//
// Every fragment is a full HTML document. We slice out of it:
// - the single <main> region (its inner HTML is what gets spliced)
// - the optional <title> text
// - the registration form descriptor, when the fragment carries one
// - whether the mobile-nav toggle pair is present
//
// A document without a <main> region cannot be swapped and is reported as
// an error; the caller treats that like any other load failure.

use crate::form::{FORM_ID, SUCCESS_REGION_ID};
use anyhow::{bail, Result};
use scraper::{ElementRef, Html, Selector};

/// Parse a literal selector. All selectors in this module are compile-time
/// strings, so a parse failure is a programming error.
fn sel(selector: &str) -> Selector {
    Selector::parse(selector).expect("static selector is valid")
}

/// What kind of form control an element is; decides how its initial value
/// is read out of the markup
#[derive(Debug, Clone, Copy)]
enum ControlKind {
    Input,
    TextArea,
    Select,
}

/// One form control as declared by the fragment markup
#[derive(Debug, Clone)]
pub struct ControlDescriptor {
    /// Element id, when the markup supplies one (field rules address
    /// controls by id)
    pub id: Option<String>,
    /// The `name` attribute, which keys the accepted data record
    pub name: Option<String>,
    /// Initial value carried by the markup
    pub value: String,
}

/// The registration form as declared by a fragment, controls in document
/// order
#[derive(Debug, Clone)]
pub struct FormDescriptor {
    pub controls: Vec<ControlDescriptor>,
}

/// Everything extracted from one fetched fragment document
#[derive(Debug, Clone)]
pub struct Fragment {
    /// Text of the fragment's <title>, if it has one
    pub title: Option<String>,
    /// Inner HTML of the fragment's <main> region
    pub main_html: String,
    /// Registration form descriptor, when the fragment contains it
    pub form: Option<FormDescriptor>,
    /// Whether both halves of the mobile-nav toggle pair are present
    pub has_nav_toggle: bool,
    /// Whether the fragment carries the success-message region
    pub has_success_region: bool,
}

/// Parse fetched text into a [`Fragment`].
///
/// Fails when the document has no <main> region; everything else is
/// optional.
pub fn parse(text: &str) -> Result<Fragment> {
    let doc = Html::parse_document(text);

    let Some(main) = doc.select(&sel("main")).next() else {
        bail!("fragment has no <main> region");
    };

    let title = doc
        .select(&sel("title"))
        .next()
        .map(|el| el.text().collect::<String>());

    let form = doc
        .select(&sel(&format!("#{FORM_ID}")))
        .next()
        .map(parse_form);

    let has_nav_toggle = doc.select(&sel("#nav-toggle")).next().is_some()
        && doc.select(&sel(".hamburger")).next().is_some();

    let has_success_region = doc
        .select(&sel(&format!("#{SUCCESS_REGION_ID}")))
        .next()
        .is_some();

    Ok(Fragment {
        title,
        main_html: main.inner_html(),
        form,
        has_nav_toggle,
        has_success_region,
    })
}

/// Collect the form's input/textarea/select controls in document order
fn parse_form(form: ElementRef) -> FormDescriptor {
    let controls = form
        .select(&sel("input, textarea, select"))
        .map(|el| {
            let kind = match el.value().name() {
                "textarea" => ControlKind::TextArea,
                "select" => ControlKind::Select,
                _ => ControlKind::Input,
            };
            ControlDescriptor {
                id: el.value().attr("id").map(str::to_string),
                name: el.value().attr("name").map(str::to_string),
                value: initial_value(el, kind),
            }
        })
        .collect();

    FormDescriptor { controls }
}

/// Initial value as the markup declares it: the `value` attribute for
/// inputs, the text content for textareas, the selected (or first) option
/// for selects.
fn initial_value(el: ElementRef, kind: ControlKind) -> String {
    match kind {
        ControlKind::Input => el.value().attr("value").unwrap_or_default().to_string(),
        ControlKind::TextArea => el.text().collect::<String>(),
        ControlKind::Select => {
            let options: Vec<ElementRef> = el.select(&sel("option")).collect();
            options
                .iter()
                .find(|opt| opt.value().attr("selected").is_some())
                .or_else(|| options.first())
                .map(|opt| {
                    opt.value()
                        .attr("value")
                        .map(str::to_string)
                        .unwrap_or_else(|| opt.text().collect::<String>())
                })
                .unwrap_or_default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r##"<!doctype html>
<html>
  <head><title>Cadastro de Voluntários</title></head>
  <body>
    <header>
      <input type="checkbox" id="nav-toggle">
      <button class="hamburger" aria-expanded="false">☰</button>
    </header>
    <main>
      <h1>Cadastro</h1>
      <form id="volunteerform">
        <input id="nome" name="nome" value="">
        <input id="email" name="email" value="">
        <textarea id="endereco" name="endereco">Rua das Flores, 12</textarea>
        <select id="estado" name="estado">
          <option value="SP">São Paulo</option>
          <option value="PE" selected>Pernambuco</option>
        </select>
      </form>
      <div id="sucessmessage" hidden>Obrigado!</div>
    </main>
  </body>
</html>"##;

    #[test]
    fn test_extracts_title_and_main() {
        let frag = parse(PAGE).unwrap();
        assert_eq!(frag.title.as_deref(), Some("Cadastro de Voluntários"));
        assert!(frag.main_html.contains("<h1>Cadastro</h1>"));
        // Only <main>'s inner HTML, not the surrounding shell
        assert!(!frag.main_html.contains("hamburger"));
    }

    #[test]
    fn test_form_controls_in_document_order() {
        let frag = parse(PAGE).unwrap();
        let form = frag.form.expect("fragment declares the form");
        let ids: Vec<_> = form
            .controls
            .iter()
            .map(|c| c.id.as_deref().unwrap_or(""))
            .collect();
        assert_eq!(ids, ["nome", "email", "endereco", "estado"]);
        // Textarea initial value comes from its text content
        assert_eq!(form.controls[2].value, "Rua das Flores, 12");
    }

    #[test]
    fn test_select_initial_value_prefers_selected_option() {
        let frag = parse(PAGE).unwrap();
        let form = frag.form.unwrap();
        assert_eq!(form.controls[3].value, "PE");
    }

    #[test]
    fn test_nav_toggle_requires_both_halves() {
        let frag = parse(PAGE).unwrap();
        assert!(frag.has_nav_toggle);

        let no_hamburger = PAGE.replace("class=\"hamburger\"", "class=\"menu\"");
        let frag = parse(&no_hamburger).unwrap();
        assert!(!frag.has_nav_toggle);
    }

    #[test]
    fn test_missing_main_is_an_error() {
        let err = parse("<html><body><p>sem main</p></body></html>").unwrap_err();
        assert!(err.to_string().contains("main"));
    }

    #[test]
    fn test_fragment_without_form() {
        let frag = parse("<html><head><title>t</title></head><body><main>oi</main></body></html>")
            .unwrap();
        assert!(frag.form.is_none());
        assert!(!frag.has_nav_toggle);
        assert!(!frag.has_success_region);
    }

    #[test]
    fn test_success_region_detected() {
        let frag = parse(PAGE).unwrap();
        assert!(frag.has_success_region);
    }
}
