//! YAML adapter for annotated-config.
//!
//! ```no_run
//! use annotated_config_core::{Configuration, Loader, Saver};
//! use annotated_config_yaml::YamlConfig;
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
//! let server = YamlConfig::<Server>::create("server.yml")?;
//! println!("listening on {}", server.port);
//! # Ok::<(), annotated_config_core::ConfigError>(())
//! ```

use annotated_config_core::{ConfigFile, Document, Format};

mod comments;
mod parse;
mod render;

/// The YAML file format.
#[derive(Debug, Clone, Copy, Default)]
pub struct Yaml;

impl Format for Yaml {
    fn name(&self) -> &'static str {
        "yaml"
    }

    fn extension(&self) -> &'static str {
        "yml"
    }

    fn parse(&self, source: &str) -> Result<Document, String> {
        parse::parse(source)
    }

    fn render(&self, document: &Document) -> Result<String, String> {
        let text = render::render(document);
        tracing::trace!(bytes = text.len(), "rendered yaml document");
        Ok(text)
    }
}

/// A configuration bound to a YAML file.
pub type YamlConfig<C> = ConfigFile<C, Yaml>;
