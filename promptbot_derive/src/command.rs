use anyhow::Result;
use darling::FromField;
use darling::{FromDeriveInput, ast::Data};
use proc_macro::TokenStream;
use proc_macro2::{Ident, Span};
use quote::quote;
use syn::LitStr;
use syn::parse_macro_input;
use thiserror::Error;

const DEFAULT_DESCRIPTION: &str = "No description provided";

#[derive(Debug, FromDeriveInput)]
#[darling(attributes(command), supports(struct_named, struct_unit))]
struct CommandReceiver {
    ident: syn::Ident,
    data: Data<(), OptionReceiver>,
    name: String,
    #[darling(default)]
    description: Option<String>,
}

#[derive(Debug, FromField)]
#[darling(attributes(option))]
struct OptionReceiver {
    ident: Option<syn::Ident>,
    ty: syn::Type,
    /// Override the name of the command option
    #[darling(default)]
    name: Option<String>,
    /// Set the description of the command option
    #[darling(default)]
    description: Option<String>,
    /// For string options, the minimum accepted length
    #[darling(default)]
    min_length: Option<u16>,
    /// For string options, the maximum accepted length
    #[darling(default)]
    max_length: Option<u16>,
}

pub fn derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as syn::DeriveInput);
    let receiver = match CommandReceiver::from_derive_input(&input) {
        Ok(r) => r,
        Err(e) => return e.write_errors().into(),
    };

    if let Err(e) = validate_name(&receiver.name) {
        return e.to_compile_error();
    }
    let description = receiver
        .description
        .as_deref()
        .unwrap_or(DEFAULT_DESCRIPTION);
    if let Err(e) = validate_description(description) {
        return e.to_compile_error();
    }

    let fields = match receiver.data.take_struct() {
        Some(fields) => fields.fields,
        None => {
            return darling::Error::custom("only structs are supported")
                .write_errors()
                .into();
        }
    };

    let options = fields
        .iter()
        .map(field_option)
        .collect::<Vec<proc_macro2::TokenStream>>();

    let field_names: Result<Vec<(String, Ident)>> = fields.iter().map(field_name).collect();
    let field_names = match field_names {
        Ok(names) => names,
        Err(e) => return darling::Error::custom(e.to_string()).write_errors().into(),
    };

    let ident = receiver.ident;
    let command_name = LitStr::new(&receiver.name, Span::call_site());
    let description = LitStr::new(description, Span::call_site());

    let struct_fields = field_names.iter().map(|(name, field_ident)| {
        quote! {
            #field_ident: ::promptbot::arguments::parse(options, #name)?
        }
    });

    let unused_options = if fields.is_empty() {
        quote! { let _ = options; }
    } else {
        quote! {}
    };

    quote! {
        #[automatically_derived]
        impl ::promptbot::commands::CommandArgs for #ident {
            fn name() -> &'static str {
                #command_name
            }

            fn description() -> &'static str {
                #description
            }

            fn options() -> Vec<::promptbot::arguments::CommandOption> {
                vec![
                    #(#options),*
                ]
            }

            fn from_options(options: &::promptbot::arguments::OptionValues) -> ::anyhow::Result<Self> {
                #unused_options
                Ok(Self {
                    #(#struct_fields,)*
                })
            }
        }
    }
    .into()
}

fn field_option(field: &OptionReceiver) -> proc_macro2::TokenStream {
    let name = match get_name(field) {
        Ok(name) => name,
        Err(e) => return darling::Error::custom(e.to_string()).write_errors(),
    };
    if let Err(e) = validate_name(&name) {
        return darling::Error::custom(e.to_string()).write_errors();
    }
    let description = field.description.as_deref().unwrap_or(DEFAULT_DESCRIPTION);
    if let Err(e) = validate_description(description) {
        return darling::Error::custom(e.to_string()).write_errors();
    }
    let ty = &field.ty;

    let min_length = field
        .min_length
        .map(|len| quote! { .min_length(#len) })
        .unwrap_or_default();
    let max_length = field
        .max_length
        .map(|len| quote! { .max_length(#len) })
        .unwrap_or_default();

    quote! {
        <#ty as ::promptbot::arguments::ToOption>::to_option()
            .name(#name)
            .description(#description)
            #min_length
            #max_length
    }
}

#[derive(Error, Debug)]
enum FieldNameError {
    #[error(transparent)]
    Name(#[from] NameError),
    #[error("Field is missing an identifier")]
    MissingIdent,
}

fn field_name(field: &OptionReceiver) -> Result<(String, Ident)> {
    let name = get_name(field).map_err(FieldNameError::from)?;
    let ident = field
        .ident
        .as_ref()
        .ok_or(FieldNameError::MissingIdent)?
        .clone();
    Ok((name, ident))
}

#[derive(Error, Debug)]
enum NameError {
    #[error("Unable to determine field name for option")]
    MissingFieldName,
    #[error("`{0}` is not a valid command name: use 1-32 lowercase letters, digits, `-` or `_`")]
    Invalid(String),
    #[error("Descriptions must be between 1 and 100 characters")]
    DescriptionLength,
}

impl NameError {
    fn to_compile_error(&self) -> TokenStream {
        darling::Error::custom(self.to_string()).write_errors().into()
    }
}

/// Gets the name of an `OptionReceiver`
fn get_name(field: &OptionReceiver) -> Result<String, NameError> {
    if let Some(name) = &field.name {
        Ok(name.clone())
    } else if let Some(ident) = &field.ident {
        Ok(ident.to_string())
    } else {
        Err(NameError::MissingFieldName)
    }
}

fn validate_name(name: &str) -> Result<(), NameError> {
    let length = name.chars().count();
    let valid_chars = name
        .chars()
        .all(|c| c.is_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if (1..=32).contains(&length) && valid_chars {
        Ok(())
    } else {
        Err(NameError::Invalid(name.to_string()))
    }
}

fn validate_description(description: &str) -> Result<(), NameError> {
    if (1..=100).contains(&description.chars().count()) {
        Ok(())
    } else {
        Err(NameError::DescriptionLength)
    }
}
