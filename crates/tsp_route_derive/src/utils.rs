use quote::quote;
use syn::{Path, Type, TypePath};

/// Parse expression for a valued option. `raw: String` and `name: &str` are in
/// scope where this expands.
pub fn build_cli_parse_expr(ty: &Type, parse_with: Option<&Path>) -> proc_macro2::TokenStream {
    if let Some(parse_with) = parse_with {
        return quote! { #parse_with(&raw)? };
    }

    if is_string(ty) {
        return quote! { raw };
    }

    quote! {
        raw.trim().parse::<#ty>()
            .map_err(|e| crate::Error::invalid_input(format!(
                "Invalid value for --{name}: {raw} ({e})"
            )))?
    }
}

fn is_string(ty: &Type) -> bool {
    let Type::Path(TypePath { qself: None, path }) = ty else {
        return false;
    };
    match path.segments.len() {
        1 => path.segments[0].ident == "String",
        3 => {
            (path.segments[0].ident == "std" || path.segments[0].ident == "alloc")
                && path.segments[1].ident == "string"
                && path.segments[2].ident == "String"
        }
        _ => false,
    }
}

pub fn to_kebab_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for (idx, ch) in s.chars().enumerate() {
        if ch == '_' {
            out.push('-');
        } else if ch.is_ascii_uppercase() {
            if idx != 0 && !out.ends_with('-') {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::{is_string, to_kebab_case};

    #[test]
    fn to_kebab_case_handles_pascal_and_snake_names() {
        assert_eq!(to_kebab_case("InputFormat"), "input-format");
        assert_eq!(to_kebab_case("exact_threshold"), "exact-threshold");
        assert_eq!(to_kebab_case("Snake_Case"), "snake-case");
        assert_eq!(to_kebab_case("X"), "x");
    }

    #[test]
    fn is_string_matches_short_and_qualified_paths_only() {
        let short: syn::Type = parse_quote!(String);
        let qualified: syn::Type = parse_quote!(std::string::String);
        let other: syn::Type = parse_quote!(usize);
        let reference: syn::Type = parse_quote!(&str);

        assert!(is_string(&short));
        assert!(is_string(&qualified));
        assert!(!is_string(&other));
        assert!(!is_string(&reference));
    }
}
