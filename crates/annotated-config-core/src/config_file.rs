//! A configuration struct bound to a file on disk.
//!
//! [`ConfigFile::create`] builds the struct from its `Default`, loads the
//! file over it and saves the result straight back, so after creation the
//! file always lists every property with its comments.

use std::borrow::Cow;
use std::fs;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::binding::{Configuration, LoadReport, Loader, Saver};
use crate::document::Document;
use crate::error::{ConfigError, Result};
use crate::file_util;
use crate::format::Format;

/// Initial contents for a configuration file that does not exist yet.
#[derive(Debug, Clone)]
pub enum DefaultResource {
    /// Inline text, typically from `include_str!`.
    Text(Cow<'static, str>),
    /// Another file to copy from.
    File(PathBuf),
}

impl DefaultResource {
    pub fn text(text: impl Into<Cow<'static, str>>) -> Self {
        Self::Text(text.into())
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    fn read(&self) -> Result<Cow<'_, str>> {
        match self {
            Self::Text(text) => Ok(Cow::Borrowed(text.as_ref())),
            Self::File(path) => fs::read_to_string(path).map(Cow::Owned).map_err(|e| {
                ConfigError::DefaultResource(format!("cannot read {}: {e}", path.display()))
            }),
        }
    }
}

/// Builder for [`ConfigFile`]; `build` performs the initial load and save.
pub struct ConfigFileBuilder<C, F> {
    path: PathBuf,
    default_resource: Option<DefaultResource>,
    config: C,
    format: F,
}

impl<C: Configuration, F: Format> ConfigFileBuilder<C, F> {
    /// Copy this resource into the file when the file has to be created.
    pub fn default_resource(mut self, resource: DefaultResource) -> Self {
        self.default_resource = Some(resource);
        self
    }

    /// Start from this configuration instead of `C::default()`.
    pub fn config(mut self, config: C) -> Self {
        self.config = config;
        self
    }

    pub fn format(mut self, format: F) -> Self {
        self.format = format;
        self
    }

    pub fn build(self) -> Result<ConfigFile<C, F>> {
        let mut file = ConfigFile {
            path: self.path,
            default_resource: self.default_resource,
            format: self.format,
            config: self.config,
            document: Document::new(),
            last_load: LoadReport::default(),
        };
        debug!(path = %file.path.display(), format = file.format.name(), "creating configuration");
        file.load()?;
        file.save()?;
        Ok(file)
    }
}

/// A configuration struct `C` bound to a file written in format `F`.
///
/// Dereferences to `C`, so fields read as `file.port`.
#[derive(Debug)]
pub struct ConfigFile<C, F> {
    path: PathBuf,
    default_resource: Option<DefaultResource>,
    format: F,
    config: C,
    document: Document,
    last_load: LoadReport,
}

impl<C, F> ConfigFile<C, F>
where
    C: Configuration + Default,
    F: Format + Default,
{
    /// Bind `C::default()` to `path`: create the file if needed, load it,
    /// then save.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        Self::builder(path).build()
    }

    pub fn builder(path: impl Into<PathBuf>) -> ConfigFileBuilder<C, F> {
        ConfigFileBuilder {
            path: path.into(),
            default_resource: None,
            config: C::default(),
            format: F::default(),
        }
    }
}

impl<C: Configuration, F: Format> ConfigFile<C, F> {
    /// Read the file and copy every compatible value into the configuration.
    pub fn load(&mut self) -> Result<LoadReport> {
        self.ensure_file()?;
        let document = self.read_document()?;

        let mut report = LoadReport::default();
        self.config
            .load_properties(&mut Loader::new(document.root(), &mut report));
        debug!(
            path = %self.path.display(),
            applied = report.applied.len(),
            missing = report.missing.len(),
            rejected = report.rejected.len(),
            "configuration loaded"
        );

        self.document = document;
        self.last_load = report.clone();
        Ok(report)
    }

    /// Write the configuration back to the file.
    ///
    /// The file is re-read first so comments and keys the configuration does
    /// not know about survive the write.
    pub fn save(&mut self) -> Result<()> {
        self.ensure_file()?;
        let mut document = self.read_document()?;
        self.config.save_properties(&mut Saver::new(document.root_mut()));

        let text = self.render_document(&document)?;
        fs::write(&self.path, text).map_err(|source| ConfigError::Write {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), "configuration saved");

        self.document = document;
        Ok(())
    }

    /// The document as of the last load or save, rendered in this format.
    pub fn render(&self) -> Result<String> {
        self.render_document(&self.document)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Outcome of the most recent [`load`](Self::load).
    pub fn last_load(&self) -> &LoadReport {
        &self.last_load
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> &F {
        &self.format
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut C {
        &mut self.config
    }

    pub fn into_inner(self) -> C {
        self.config
    }

    fn read_document(&self) -> Result<Document> {
        let text = fs::read_to_string(&self.path).map_err(|source| ConfigError::Read {
            path: self.path.clone(),
            source,
        })?;
        self.format.parse(&text).map_err(|message| ConfigError::Parse {
            path: self.path.clone(),
            format: self.format.name(),
            message,
        })
    }

    fn render_document(&self, document: &Document) -> Result<String> {
        self.format
            .render(document)
            .map_err(|message| ConfigError::Render {
                format: self.format.name(),
                message,
            })
    }

    /// Create the file if missing and, only then, fill it from the default
    /// resource.
    fn ensure_file(&self) -> Result<()> {
        let created = file_util::ensure_file(&self.path).map_err(|source| ConfigError::Create {
            path: self.path.clone(),
            source,
        })?;
        if !created {
            return Ok(());
        }
        debug!(path = %self.path.display(), "created configuration file");

        let Some(resource) = &self.default_resource else {
            return Ok(());
        };
        let text = resource.read()?;
        let mut copied = String::with_capacity(text.len() + 1);
        for line in text.lines() {
            copied.push_str(line);
            copied.push('\n');
        }
        fs::write(&self.path, copied).map_err(|e| {
            ConfigError::DefaultResource(format!(
                "cannot copy default resource to {}: {e}",
                self.path.display()
            ))
        })?;
        debug!(path = %self.path.display(), "copied default resource");
        Ok(())
    }
}

impl<C, F> Deref for ConfigFile<C, F> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.config
    }
}

impl<C, F> DerefMut for ConfigFile<C, F> {
    fn deref_mut(&mut self) -> &mut C {
        &mut self.config
    }
}
