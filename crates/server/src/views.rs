//! Server-rendered HTML fragments
//!
//! Markup is written for htmx: `form` is swapped in place after a submit,
//! `oob_contact` appends a new row to `#contacts` out of band, and each
//! contact row deletes itself via `hx-delete`.

use std::collections::BTreeMap;
use std::fmt::{self, Write};

use service::Contact;

pub const FIELD_NAME: &str = "name";
pub const FIELD_EMAIL: &str = "email";

/// Submitted form values plus per-field error messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    pub values: BTreeMap<String, String>,
    pub errors: BTreeMap<String, String>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Form pre-filled with a rejected submission.
    pub fn with_values(name: &str, email: &str) -> Self {
        let mut form = Self::new();
        form.values.insert(FIELD_NAME.into(), name.into());
        form.values.insert(FIELD_EMAIL.into(), email.into());
        form
    }

    pub fn with_error(mut self, field: &str, message: &str) -> Self {
        self.errors.insert(field.into(), message.into());
        self
    }

    pub fn value(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }
}

/// Everything the full page needs.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub form: FormData,
    pub contacts: Vec<Contact>,
}

/// Escape text for use in element content and double-quoted attributes.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn index(page: &Page) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"en\">")?;
    writeln!(out, "<head>")?;
    writeln!(out, "  <meta charset=\"UTF-8\">")?;
    writeln!(out, "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">")?;
    writeln!(out, "  <title>Contacts</title>")?;
    writeln!(out, "  <script src=\"https://unpkg.com/htmx.org@1.9.12\"></script>")?;
    writeln!(out, "  <link rel=\"stylesheet\" href=\"/css/index.css\">")?;
    writeln!(out, "</head>")?;
    writeln!(out, "<body>")?;
    out.push_str(&form(&page.form)?);
    writeln!(out, "<hr>")?;
    writeln!(out, "<div id=\"contacts\" class=\"contacts\">")?;
    for c in &page.contacts {
        out.push_str(&contact(c)?);
    }
    writeln!(out, "</div>")?;
    // htmx ignores 4xx bodies by default; the form re-render arrives as 422.
    writeln!(out, "<script>")?;
    writeln!(out, "  document.addEventListener(\"DOMContentLoaded\", () => {{")?;
    writeln!(out, "    document.body.addEventListener(\"htmx:beforeSwap\", (evt) => {{")?;
    writeln!(out, "      if (evt.detail.xhr.status === 422) {{")?;
    writeln!(out, "        evt.detail.shouldSwap = true;")?;
    writeln!(out, "        evt.detail.isError = false;")?;
    writeln!(out, "      }}")?;
    writeln!(out, "    }});")?;
    writeln!(out, "  }});")?;
    writeln!(out, "</script>")?;
    writeln!(out, "</body>")?;
    writeln!(out, "</html>")?;
    Ok(out)
}

/// New-contact form. Swaps itself on submit.
pub fn form(data: &FormData) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "<form id=\"contact-form\" hx-post=\"/contacts\" hx-swap=\"outerHTML\">")?;
    for (field, label) in [(FIELD_NAME, "Name"), (FIELD_EMAIL, "Email")] {
        writeln!(
            out,
            "  <label>{label}: <input type=\"text\" name=\"{field}\" value=\"{}\"></label>",
            escape(data.value(field))
        )?;
        if let Some(err) = data.error(field) {
            writeln!(out, "  <div class=\"error\">{}</div>", escape(err))?;
        }
    }
    writeln!(out, "  <button type=\"submit\">Create Contact</button>")?;
    writeln!(out, "</form>")?;
    Ok(out)
}

/// One row of the contact list.
pub fn contact(c: &Contact) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let id = c.id;
    writeln!(out, "<div class=\"contact\" id=\"contact-{id}\">")?;
    writeln!(
        out,
        "  <div class=\"delete\" hx-delete=\"/contacts/{id}\" hx-target=\"#contact-{id}\" hx-swap=\"outerHTML swap:500ms\" hx-indicator=\"#ci-{id}\">"
    )?;
    writeln!(out, "    <img src=\"/images/delete.svg\" alt=\"Delete\">")?;
    writeln!(out, "  </div>")?;
    writeln!(out, "  <span>Name: {}</span>", escape(&c.name))?;
    writeln!(out, "  <span>Email: {}</span>", escape(&c.email))?;
    writeln!(out, "  <div id=\"ci-{id}\" class=\"htmx-indicator\">")?;
    writeln!(out, "    <img src=\"/images/bars.svg\" alt=\"loading\">")?;
    writeln!(out, "  </div>")?;
    writeln!(out, "</div>")?;
    Ok(out)
}

/// Contact row wrapped for an out-of-band append to `#contacts`.
pub fn oob_contact(c: &Contact) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "<div id=\"contacts\" hx-swap-oob=\"beforeend\">")?;
    out.push_str(&contact(c)?);
    writeln!(out, "</div>")?;
    Ok(out)
}
