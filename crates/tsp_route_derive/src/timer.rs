use proc_macro::TokenStream;
use quote::quote;
use syn::{ItemFn, LitStr, parse::Parser, parse_macro_input};

/// `#[timer()]` or `#[timer(name = "label")]`.
///
/// Opens a `crate::utils::ScopeTimer` as the first statement of the function,
/// so the elapsed time is logged however the function returns.
pub fn timer_inner(attr: TokenStream, item: TokenStream) -> TokenStream {
    let ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = parse_macro_input!(item as ItemFn);

    let mut label = sig.ident.to_string();
    let parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("name") {
            let lit: LitStr = meta.value()?.parse()?;
            label = lit.value();
            return Ok(());
        }
        Err(meta.error("unsupported timer attribute; expected name = \"...\""))
    });
    if let Err(err) = parser.parse(attr) {
        return err.to_compile_error().into();
    }

    let label_lit = LitStr::new(&label, sig.ident.span());

    let expanded = quote! {
        #(#attrs)*
        #vis #sig {
            let _scope_timer = crate::utils::ScopeTimer::start(#label_lit);
            #block
        }
    };

    TokenStream::from(expanded)
}
