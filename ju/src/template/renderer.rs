use std::io::Write;

use handlebars::{Handlebars, Template};
use serde::Serialize;
use tracing::{debug, error};

use super::helpers;
use crate::error::{Result, UtilError};

/// Renders templates with the helper library registered
pub struct Renderer {
    hbs: Handlebars<'static>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        debug!("Renderer::new: called");
        let mut hbs = Handlebars::new();
        hbs.register_escape_fn(handlebars::no_escape);
        helpers::register(&mut hbs);
        Self { hbs }
    }

    /// Compile `source` and execute it against `data`, streaming to `out`
    ///
    /// Nothing is written when the template fails to parse.
    pub fn render<T, W>(&self, source: &str, data: &T, out: W) -> Result<()>
    where
        T: Serialize,
        W: Write,
    {
        debug!(source_len = source.len(), "Renderer::render: called");
        if let Err(e) = Template::compile(source) {
            error!("Failed to parse template: {}", e);
            return Err(e.into());
        }

        self.hbs.render_template_to_write(source, data, out).map_err(|e| {
            error!("Failed to execute template: {}", e);
            UtilError::from(e)
        })
    }

    /// Render into a `String`
    pub fn render_to_string<T: Serialize>(&self, source: &str, data: &T) -> Result<String> {
        let mut buf = Vec::new();
        self.render(source, data, &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// Render `source` against `data` to standard output
pub fn render<T: Serialize>(source: &str, data: &T) -> Result<()> {
    let stdout = std::io::stdout();
    Renderer::new().render(source, data, stdout.lock())
}
