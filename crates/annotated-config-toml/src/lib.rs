//! TOML adapter for annotated-config.
//!
//! ```no_run
//! use annotated_config_core::{Configuration, Loader, Saver};
//! use annotated_config_toml::TomlConfig;
//!
//! #[derive(Default)]
//! struct Server {
//!     port: u16,
//! }
//!
//! impl Configuration for Server {
//!     fn load_properties(&mut self, loader: &mut Loader<'_>) {
//!         loader.property("port", &mut self.port);
//!     }
//!
//!     fn save_properties(&self, saver: &mut Saver<'_>) {
//!         saver.property("port", &["Port to listen on."], &self.port);
//!     }
//! }
//!
//! let server = TomlConfig::<Server>::create("server.toml")?;
//! println!("listening on {}", server.port);
//! # Ok::<(), annotated_config_core::ConfigError>(())
//! ```

use annotated_config_core::{ConfigFile, Document, Format};

mod comments;
mod parse;
mod render;

/// The TOML file format.
#[derive(Debug, Clone, Copy, Default)]
pub struct Toml;

impl Format for Toml {
    fn name(&self) -> &'static str {
        "toml"
    }

    fn extension(&self) -> &'static str {
        "toml"
    }

    fn parse(&self, source: &str) -> Result<Document, String> {
        parse::parse(source)
    }

    fn render(&self, document: &Document) -> Result<String, String> {
        let text = render::render(document)?;
        tracing::trace!(bytes = text.len(), "rendered toml document");
        Ok(text)
    }
}

/// A configuration bound to a TOML file.
pub type TomlConfig<C> = ConfigFile<C, Toml>;
