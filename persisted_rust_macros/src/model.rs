use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr};

pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    // Extract #[model(primary_key = "...")] from struct-level attributes
    let primary_key = match extract_primary_key(&input) {
        Ok(key) => key,
        Err(err) => return err.to_compile_error().into(),
    };

    // Extract the field marked with #[model(tracker)] or default to "tracker"
    let tracker_field = match extract_tracker_field(&input) {
        Ok(field) => field,
        Err(err) => return err.to_compile_error().into(),
    };

    let expanded = quote! {
        impl #impl_generics persisted_rust::Model for #name #ty_generics #where_clause {
            const PRIMARY_KEY: &'static str = #primary_key;

            fn tracker(&self) -> &persisted_rust::Tracker {
                &self.#tracker_field
            }

            fn tracker_mut(&mut self) -> &mut persisted_rust::Tracker {
                &mut self.#tracker_field
            }
        }
    };

    TokenStream::from(expanded)
}

fn extract_primary_key(input: &DeriveInput) -> syn::Result<String> {
    for attr in &input.attrs {
        if !attr.path().is_ident("model") {
            continue;
        }

        let mut primary_key = None;
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("primary_key") {
                let value: LitStr = meta.value()?.parse()?;
                if value.value().is_empty() {
                    return Err(meta.error("primary_key must not be empty"));
                }
                primary_key = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported model attribute, expected `primary_key`"))
            }
        })?;

        if let Some(key) = primary_key {
            return Ok(key);
        }
    }

    Ok("id".to_string())
}

fn extract_tracker_field(input: &DeriveInput) -> syn::Result<syn::Ident> {
    if let Data::Struct(data_struct) = &input.data {
        if let Fields::Named(fields) = &data_struct.fields {
            for field in &fields.named {
                for attr in &field.attrs {
                    if attr.path().is_ident("model") {
                        let mut is_tracker = false;
                        attr.parse_nested_meta(|meta| {
                            if meta.path.is_ident("tracker") {
                                is_tracker = true;
                                Ok(())
                            } else {
                                Err(meta.error("unsupported model attribute, expected `tracker`"))
                            }
                        })?;
                        if is_tracker {
                            if let Some(ident) = &field.ident {
                                return Ok(ident.clone());
                            }
                        }
                    }
                }
            }

            // Default: look for a field named "tracker"
            for field in &fields.named {
                if let Some(ident) = &field.ident {
                    if ident == "tracker" {
                        return Ok(ident.clone());
                    }
                }
            }
        }
    }

    Err(syn::Error::new_spanned(
        &input.ident,
        "Model derive: no field marked with #[model(tracker)] and no field named `tracker`",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn primary_key_defaults_to_id() {
        let input: DeriveInput = parse_quote! {
            struct User { name: String, tracker: Tracker }
        };
        assert_eq!(extract_primary_key(&input).unwrap(), "id");
    }

    #[test]
    fn primary_key_from_attribute() {
        let input: DeriveInput = parse_quote! {
            #[model(primary_key = "uid")]
            struct Note { uid: String, tracker: Tracker }
        };
        assert_eq!(extract_primary_key(&input).unwrap(), "uid");
    }

    #[test]
    fn malformed_primary_key_is_an_error() {
        let input: DeriveInput = parse_quote! {
            #[model(primary_key = 5)]
            struct User { id: String, tracker: Tracker }
        };
        assert!(extract_primary_key(&input).is_err());
    }

    #[test]
    fn unknown_struct_attribute_is_an_error() {
        let input: DeriveInput = parse_quote! {
            #[model(primary = "id")]
            struct User { id: String, tracker: Tracker }
        };
        assert!(extract_primary_key(&input).is_err());
    }

    #[test]
    fn tracker_field_marked_or_by_name() {
        let marked: DeriveInput = parse_quote! {
            struct Note { uid: String, #[model(tracker)] dirty: Tracker }
        };
        let named: DeriveInput = parse_quote! {
            struct User { id: String, tracker: Tracker }
        };
        assert_eq!(extract_tracker_field(&marked).unwrap(), "dirty");
        assert_eq!(extract_tracker_field(&named).unwrap(), "tracker");
    }

    #[test]
    fn missing_tracker_field_is_an_error() {
        let input: DeriveInput = parse_quote! {
            struct User { id: String }
        };
        assert!(extract_tracker_field(&input).is_err());
    }
}
