extern crate proc_macro;
use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Type, parse_macro_input};

/// Derive `util::FlagTable` for a settings struct.
///
/// Every named field goes in the table, fields of type `bool` get a getter.
#[proc_macro_derive(FlagTable)]
pub fn derive_flag_table(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    let name = &ast.ident;

    if !ast.generics.params.is_empty() {
        return syn::Error::new_spanned(
            &ast.generics,
            "FlagTable can't be derived for generic types",
        )
        .to_compile_error()
        .into();
    }

    let fields = match &ast.data {
        Data::Struct(s) => match &s.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return syn::Error::new_spanned(
                    &ast,
                    "FlagTable needs a struct with named fields",
                )
                .to_compile_error()
                .into();
            }
        },
        _ => {
            return syn::Error::new_spanned(
                &ast,
                "FlagTable can only be derived for structs",
            )
            .to_compile_error()
            .into();
        }
    };

    let entries = fields.iter().filter_map(|f| {
        let ident = f.ident.as_ref()?;
        let key = ident.to_string();
        Some(if is_bool(&f.ty) {
            quote! { (#key, Some(|s: &#name| s.#ident)) }
        } else {
            quote! { (#key, None) }
        })
    });

    let expanded = quote! {
        impl util::FlagTable for #name {
            fn fields() -> &'static [(&'static str, Option<fn(&Self) -> bool>)] {
                const FIELDS: &[(&str, Option<fn(&#name) -> bool>)] =
                    &[#(#entries),*];
                FIELDS
            }
        }
    };
    expanded.into()
}

fn is_bool(ty: &Type) -> bool {
    match ty {
        Type::Path(p) if p.qself.is_none() => p.path.is_ident("bool"),
        _ => false,
    }
}
