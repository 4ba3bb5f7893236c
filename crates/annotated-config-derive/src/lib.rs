//! Derive macro for the `Configuration` trait of `annotated-config`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod configuration;

/// Derive an implementation of `Configuration` for a struct with named fields.
///
/// Each field marked with `#[config(property)]` is bound to one key of the file; each field marked
/// with `#[config(section)]` is bound to a nested table and its type must itself implement
/// `Configuration`. Unmarked fields are left alone. The default values of a configuration are
/// whatever the struct's `Default` implementation produces.
///
/// # Examples
///
/// ```ignore
/// use annotated_config::Configuration;
///
/// #[derive(Configuration)]
/// struct Settings {
///     #[config(property = "integer", comment = "How many workers to start.")]
///     workers: i32,
///     #[config(section = "a", comment = "Section A")]
///     a: SectionA,
///     cache: Vec<u8>,
/// }
///
/// #[derive(Configuration, Default)]
/// struct SectionA {
///     #[config(property, comment = "This is a name.")]
///     name: Option<String>,
/// }
/// ```
///
/// ## Generated code.
///
/// ```ignore
/// impl annotated_config::Configuration for Settings {
///     fn load_properties(&mut self, loader: &mut annotated_config::Loader<'_>) {
///         loader.property("integer", &mut self.workers);
///         loader.section("a", &mut self.a);
///     }
///
///     fn save_properties(&self, saver: &mut annotated_config::Saver<'_>) {
///         saver.property("integer", &["How many workers to start."], &self.workers);
///         saver.section("a", &["Section A"], &self.a);
///     }
/// }
/// ```
///
/// # Field attributes
///
/// | Attribute     | Description                                             | Arg     | Required |
/// |---------------|---------------------------------------------------------|---------|----------|
/// | property      | Bind the field to a key. The key defaults to the field name; dotted keys nest. | string | one of property/section |
/// | section       | Bind the field to a nested table. The key defaults to the field name. | string | one of property/section |
/// | comment       | A comment line written above the key when the file does not have the key yet. May be repeated. | string | no |
///
/// The generated code refers to the `annotated-config` crate when it is a dependency, and to
/// `annotated-config-core` otherwise.
#[proc_macro_derive(Configuration, attributes(config))]
pub fn derive_configuration(input: TokenStream) -> TokenStream {
    configuration::derive(parse_macro_input!(input as DeriveInput))
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
