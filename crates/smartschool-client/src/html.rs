//! Small HTML helpers on top of `scraper`: selector parsing, element text and
//! form field extraction.

use scraper::{ElementRef, Html, Selector};

use crate::error::ClientError;

pub(crate) fn selector(css: &str) -> Result<Selector, ClientError> {
    Selector::parse(css).map_err(|e| ClientError::Parse(format!("invalid selector {css:?}: {e}")))
}

/// Text of an element: every non-blank text node, trimmed, joined by newlines.
pub(crate) fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// A named control of an HTML form and its current value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FormField {
    pub name: String,
    pub value: String,
}

/// Collect the named controls of the single `form[name=..]` on the page.
///
/// `select` controls take their selected option, else the first one.
pub(crate) fn form_fields(page: &str, form_name: &str) -> Result<Vec<FormField>, ClientError> {
    let document = Html::parse_document(page);
    let form_selector = selector(&format!(r#"form[name="{form_name}"]"#))?;
    let forms: Vec<ElementRef<'_>> = document.select(&form_selector).collect();
    let [form] = forms.as_slice() else {
        return Err(ClientError::Parse(format!(
            "expected exactly one {form_name} form, found {}",
            forms.len()
        )));
    };

    let controls = selector("input[name], button[name], textarea[name], select[name]")?;
    let options = selector("option")?;

    Ok(form
        .select(&controls)
        .map(|control| {
            let element = control.value();
            let name = element.attr("name").unwrap_or_default().to_string();
            let value = match element.name() {
                "select" => {
                    let choices: Vec<(&str, bool)> = control
                        .select(&options)
                        .filter_map(|option| {
                            let value = option.value().attr("value").filter(|v| !v.is_empty())?;
                            Some((value, option.value().attr("selected").is_some()))
                        })
                        .collect();
                    choices
                        .iter()
                        .find(|(_, selected)| *selected)
                        .or_else(|| choices.first())
                        .map(|(value, _)| (*value).to_string())
                        .unwrap_or_default()
                }
                "textarea" => control.text().collect(),
                _ => element.attr("value").unwrap_or_default().to_string(),
            };
            FormField { name, value }
        })
        .collect())
}
