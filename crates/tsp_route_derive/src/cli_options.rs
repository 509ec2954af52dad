use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr, Path, parse_macro_input, spanned::Spanned};

use crate::utils;

/// How a field is fed from the command line.
enum CliField {
    /// `--name <value>` / `--name=<value>`.
    Valued {
        long: String,
        parse_with: Option<Path>,
    },
    /// `--name`, `--name=<bool>`, `--no-name`.
    Flag { long: String },
}

pub fn derive_cli_options_inner(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    let struct_ident = input.ident.clone();

    let Data::Struct(data_struct) = &input.data else {
        return syn::Error::new(input.span(), "CliOptions can only be derived for structs")
            .to_compile_error()
            .into();
    };

    let Fields::Named(fields) = &data_struct.fields else {
        return syn::Error::new(input.span(), "CliOptions requires named fields")
            .to_compile_error()
            .into();
    };

    let mut arms = Vec::new();
    let mut long_names = Vec::new();

    for field in &fields.named {
        let Some(field_ident) = &field.ident else {
            continue;
        };

        let mut long_name: Option<String> = None;
        let mut parse_with: Option<Path> = None;
        let mut is_flag = false;

        for attr in &field.attrs {
            if !attr.path().is_ident("cli") {
                continue;
            }
            let parse_result = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("long") {
                    let lit: LitStr = meta.value()?.parse()?;
                    long_name = Some(lit.value());
                    return Ok(());
                }
                if meta.path.is_ident("parse_with") {
                    let lit: LitStr = meta.value()?.parse()?;
                    parse_with = Some(syn::parse_str(&lit.value())?);
                    return Ok(());
                }
                if meta.path.is_ident("flag") {
                    is_flag = true;
                    return Ok(());
                }
                Err(meta.error("unsupported cli attribute; expected long/parse_with/flag"))
            });
            if let Err(err) = parse_result {
                return err.to_compile_error().into();
            }
        }

        let Some(long) = long_name else {
            continue;
        };

        let cli_field = if is_flag {
            if parse_with.is_some() {
                return syn::Error::new(field.span(), "cli flags cannot use parse_with")
                    .to_compile_error()
                    .into();
            }
            CliField::Flag { long }
        } else {
            CliField::Valued { long, parse_with }
        };

        match cli_field {
            CliField::Valued { long, parse_with } => {
                let long_lit = LitStr::new(&long, Span::call_site());
                let parse_expr = utils::build_cli_parse_expr(&field.ty, parse_with.as_ref());
                long_names.push(long_lit.clone());
                arms.push(quote! {
                    #long_lit => {
                        let raw = value.ok_or_else(|| {
                            crate::Error::invalid_input(format!("Missing value for --{name}"))
                        })?;
                        self.#field_ident = #parse_expr;
                        Ok(true)
                    }
                });
            }
            CliField::Flag { long } => {
                let long_lit = LitStr::new(&long, Span::call_site());
                let negated_lit = LitStr::new(&format!("no-{long}"), Span::call_site());
                long_names.push(long_lit.clone());
                long_names.push(negated_lit.clone());
                arms.push(quote! {
                    #long_lit => {
                        self.#field_ident = match value {
                            Some(raw) => crate::options::parse_bool(name, &raw)?,
                            None => true,
                        };
                        Ok(true)
                    }
                });
                arms.push(quote! {
                    #negated_lit => {
                        if value.is_some() {
                            return Err(crate::Error::invalid_input(format!(
                                "Flag --{name} does not take a value"
                            )));
                        }
                        self.#field_ident = false;
                        Ok(true)
                    }
                });
            }
        }
    }

    let flag_names: Vec<LitStr> = long_names
        .iter()
        .filter(|lit| is_flag_name(lit, &long_names))
        .cloned()
        .collect();

    let expanded = quote! {
        impl #struct_ident {
            /// Option names (without the `--` prefix) accepted by `apply_cli_option`.
            pub fn cli_option_names() -> &'static [&'static str] {
                &[#(#long_names),*]
            }

            fn split_arg(
                raw_name: &str,
                args: &mut std::iter::Peekable<impl Iterator<Item = String>>,
            ) -> (String, Option<String>) {
                if let Some((k, v)) = raw_name.split_once('=') {
                    return (k.to_string(), Some(v.to_string()));
                }

                // Flags never swallow the following argument.
                let flag_names: &[&str] = &[#(#flag_names),*];
                if flag_names.contains(&raw_name) {
                    return (raw_name.to_string(), None);
                }

                let value = match args.peek() {
                    Some(next) if !next.starts_with("--") => args.next(),
                    _ => None,
                };

                (raw_name.to_string(), value)
            }

            fn apply_cli_option(
                &mut self,
                name: &str,
                value: Option<String>,
            ) -> crate::Result<bool> {
                match name {
                    #(#arms,)*
                    _ => Ok(false),
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// A name is a flag when it is `no-x` with `x` also registered, or when its
/// `no-` form is registered.
fn is_flag_name(lit: &LitStr, all: &[LitStr]) -> bool {
    let value = lit.value();
    if let Some(base) = value.strip_prefix("no-")
        && all.iter().any(|other| other.value() == base)
    {
        return true;
    }
    let negated = format!("no-{value}");
    all.iter().any(|other| other.value() == negated)
}
