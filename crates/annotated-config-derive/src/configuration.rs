//! Expansion of `#[derive(Configuration)]`.

use proc_macro_crate::{FoundCrate, crate_name};
use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Field, Fields, Ident, LitStr, Token};

/// The path through which generated code reaches the core items.
fn core_path() -> TokenStream {
    let found = |found: FoundCrate, itself: &str| {
        let name = match found {
            FoundCrate::Itself => itself.to_string(),
            FoundCrate::Name(name) => name,
        };
        let ident = Ident::new(&name, Span::call_site());
        quote!(::#ident)
    };
    if let Ok(facade) = crate_name("annotated-config") {
        return found(facade, "annotated_config");
    }
    match crate_name("annotated-config-core") {
        Ok(core) => found(core, "annotated_config_core"),
        Err(_) => quote!(::annotated_config_core),
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Kind {
    Property,
    Section,
}

struct Binding {
    ident: Ident,
    kind: Kind,
    key: LitStr,
    comments: Vec<LitStr>,
}

fn validate_key(key: &LitStr) -> syn::Result<()> {
    let value = key.value();
    if value.is_empty() || value.split('.').any(str::is_empty) {
        return Err(syn::Error::new_spanned(
            key,
            "configuration keys must be non-empty and must not contain empty dotted segments",
        ));
    }
    Ok(())
}

/// Read the `#[config(...)]` attributes of one field. Fields without any are
/// not bound.
fn parse_field(field: &Field) -> syn::Result<Option<Binding>> {
    let mut kind = None;
    let mut key = None;
    let mut comments = Vec::new();
    let mut marked = false;

    for attr in field.attrs.iter().filter(|a| a.path().is_ident("config")) {
        marked = true;
        attr.parse_nested_meta(|meta| {
            let this = if meta.path.is_ident("property") {
                Kind::Property
            } else if meta.path.is_ident("section") {
                Kind::Section
            } else if meta.path.is_ident("comment") {
                comments.push(meta.value()?.parse::<LitStr>()?);
                return Ok(());
            } else {
                return Err(meta.error("expected `property`, `section` or `comment`"));
            };
            if kind.is_some() {
                return Err(meta.error("a field is bound as a property or a section, once"));
            }
            kind = Some(this);
            if meta.input.peek(Token![=]) {
                key = Some(meta.value()?.parse::<LitStr>()?);
            }
            Ok(())
        })?;
    }

    if !marked {
        return Ok(None);
    }
    let Some(kind) = kind else {
        return Err(syn::Error::new_spanned(
            field,
            "`#[config]` needs `property` or `section`",
        ));
    };
    let Some(ident) = field.ident.clone() else {
        return Err(syn::Error::new_spanned(field, "configuration fields must be named"));
    };
    let key = key.unwrap_or_else(|| LitStr::new(&ident.unraw().to_string(), ident.span()));
    validate_key(&key)?;

    Ok(Some(Binding {
        ident,
        kind,
        key,
        comments,
    }))
}

/// Generate the `Configuration` impl for a struct.
pub fn derive(input: DeriveInput) -> syn::Result<TokenStream> {
    let DeriveInput {
        ident,
        generics,
        data,
        ..
    } = input;

    let fields = match data {
        Data::Struct(s) => match s.fields {
            Fields::Named(named) => named.named,
            Fields::Unit => Default::default(),
            Fields::Unnamed(unnamed) => {
                return Err(syn::Error::new_spanned(
                    unnamed,
                    "Configuration cannot be derived for tuple structs",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                ident,
                "Configuration can only be derived for structs",
            ));
        }
    };

    let mut bindings = Vec::new();
    for field in &fields {
        if let Some(binding) = parse_field(field)? {
            if bindings.iter().any(|b: &Binding| b.key.value() == binding.key.value()) {
                return Err(syn::Error::new_spanned(
                    &binding.key,
                    format!("duplicate configuration key `{}`", binding.key.value()),
                ));
            }
            bindings.push(binding);
        }
    }

    let core = core_path();
    let loads = bindings.iter().map(|b| {
        let Binding { ident, key, .. } = b;
        match b.kind {
            Kind::Property => quote!(loader.property(#key, &mut self.#ident);),
            Kind::Section => quote!(loader.section(#key, &mut self.#ident);),
        }
    });
    let saves = bindings.iter().map(|b| {
        let Binding {
            ident,
            key,
            comments,
            ..
        } = b;
        match b.kind {
            Kind::Property => quote!(saver.property(#key, &[#(#comments),*], &self.#ident);),
            Kind::Section => quote!(saver.section(#key, &[#(#comments),*], &self.#ident);),
        }
    });

    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics #core::Configuration for #ident #ty_generics #where_clause {
            #[allow(unused_variables)]
            fn load_properties(&mut self, loader: &mut #core::Loader<'_>) {
                #(#loads)*
            }

            #[allow(unused_variables)]
            fn save_properties(&self, saver: &mut #core::Saver<'_>) {
                #(#saves)*
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn expand(input: DeriveInput) -> String {
        derive(input).unwrap().to_string()
    }

    fn error(input: DeriveInput) -> String {
        match derive(input) {
            Ok(tokens) => panic!("expected an error, got {tokens}"),
            Err(e) => e.to_string(),
        }
    }

    #[test]
    fn properties_and_sections() {
        let out = expand(parse_quote! {
            struct Settings {
                #[config(property = "boolean", comment = "Comment")]
                boolean_value: bool,
                #[config(section = "a", comment = "Section A", comment = "second line")]
                a: SectionA,
                ignored: u8,
            }
        });
        assert!(out.contains(r#"loader . property ("boolean" , & mut self . boolean_value)"#));
        assert!(out.contains(r#"saver . property ("boolean" , & ["Comment"] , & self . boolean_value)"#));
        assert!(out.contains(r#"loader . section ("a" , & mut self . a)"#));
        assert!(out.contains(r#"& ["Section A" , "second line"]"#));
        assert!(!out.contains("ignored"));
    }

    #[test]
    fn key_defaults_to_field_name() {
        let out = expand(parse_quote! {
            struct Settings {
                #[config(property)]
                r#type: String,
            }
        });
        assert!(out.contains(r#"loader . property ("type" , & mut self . r#type)"#));
    }

    #[test]
    fn generics_are_forwarded() {
        let out = expand(parse_quote! {
            struct Wrapper<T: Clone> where T: Default {
                #[config(property)]
                value: T,
            }
        });
        assert!(out.contains("impl < T : Clone >"));
        assert!(out.contains("for Wrapper < T > where T : Default"));
    }

    #[test]
    fn rejects_property_and_section_together() {
        let msg = error(parse_quote! {
            struct Settings {
                #[config(property, section)]
                value: u8,
            }
        });
        assert!(msg.contains("once"));
    }

    #[test]
    fn rejects_unknown_keys() {
        let msg = error(parse_quote! {
            struct Settings {
                #[config(propery)]
                value: u8,
            }
        });
        assert!(msg.contains("expected `property`"));
    }

    #[test]
    fn rejects_bare_config() {
        let msg = error(parse_quote! {
            struct Settings {
                #[config(comment = "lonely")]
                value: u8,
            }
        });
        assert!(msg.contains("needs `property` or `section`"));
    }

    #[test]
    fn rejects_duplicate_and_malformed_keys() {
        let msg = error(parse_quote! {
            struct Settings {
                #[config(property = "x")]
                a: u8,
                #[config(property = "x")]
                b: u8,
            }
        });
        assert!(msg.contains("duplicate configuration key `x`"));

        let msg = error(parse_quote! {
            struct Settings {
                #[config(property = "a..b")]
                a: u8,
            }
        });
        assert!(msg.contains("empty dotted segments"));
    }

    #[test]
    fn rejects_enums_and_tuple_structs() {
        assert!(error(parse_quote!(enum E { A })).contains("only be derived for structs"));
        assert!(error(parse_quote!(struct T(u8);)).contains("tuple structs"));
    }
}
