// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

extern crate proc_macro;

use proc_macro::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{
    parse_macro_input, parse_quote, Attribute, Data, DeriveInput, Fields, GenericParam, LitStr,
    Visibility,
};

/// `#[derive(Reflect)]` macro: generates the record descriptor of a struct
///
/// Every field type must itself implement `retag::Reflect`. Offsets, size and
/// alignment are taken from the compiler (`offset_of!`, `size_of`,
/// `align_of`), so any `repr` is described faithfully. A field is exported
/// when it is declared `pub`. Tags come from `#[retag(tag = "...")]`.
///
/// Type parameters get a `Reflect` bound. Lifetime parameters,
/// `#[repr(packed)]`, tuple structs, enums and unions are rejected.
///
/// Example:
/// ```ignore
/// use retag::Reflect;
///
/// #[derive(Reflect)]
/// pub struct Reading {
///     #[retag(tag = r#"json:"sensor_id""#)]
///     pub sensor: u32,
///     pub samples: Vec<f32>,
///     calibration: f64,     // not exported
/// }
/// ```
#[proc_macro_derive(Reflect, attributes(retag))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(mut input: DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(f) => f.named.clone(),
            _ => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "Only structs with named fields are supported",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Only structs are supported",
            ))
        }
    };

    reject_packed(&input.attrs)?;
    if let Some(lifetime) = input.generics.lifetimes().next() {
        return Err(syn::Error::new_spanned(
            lifetime,
            "Reflect types must be 'static: lifetime parameters are not supported",
        ));
    }
    for param in &mut input.generics.params {
        if let GenericParam::Type(ty) = param {
            ty.bounds.push(parse_quote!(::retag::Reflect));
        }
    }

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let type_name = if input.generics.params.is_empty() {
        let plain = name.unraw().to_string();
        quote!(#plain)
    } else {
        quote!(::core::any::type_name::<Self>())
    };

    let mut entries = Vec::with_capacity(fields.len());
    for field in &fields {
        let Some(ident) = field.ident.as_ref() else {
            return Err(syn::Error::new_spanned(field, "Field must have a name"));
        };
        let ty = &field.ty;
        let field_name = ident.unraw().to_string();
        let exported = matches!(field.vis, Visibility::Public(_));
        let tag = field_tag(&field.attrs)?.unwrap_or_default();

        entries.push(quote! {
            ::retag::FieldDescriptor::new(
                #field_name,
                <#ty as ::retag::Reflect>::type_ref(),
                ::core::mem::offset_of!(Self, #ident),
            )
            .exported(#exported)
            .with_tag(#tag)
        });
    }

    Ok(quote! {
        unsafe impl #impl_generics ::retag::Reflect for #name #ty_generics #where_clause {
            fn type_ref() -> ::retag::TypeRef {
                let build = || {
                    ::retag::TypeDescriptor::record(
                        #type_name,
                        ::std::vec![#(#entries),*],
                        ::core::mem::size_of::<Self>(),
                        ::core::mem::align_of::<Self>(),
                    )
                };
                // SAFETY: sizes and offsets are taken from `Self` itself.
                unsafe { ::retag::reflect::intern::<Self>(build) }
            }
        }
    })
}

/// Views hand out `&V` to fields, which must be aligned.
fn reject_packed(attrs: &[Attribute]) -> syn::Result<()> {
    for attr in attrs.iter().filter(|a| a.path().is_ident("repr")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("packed") {
                return Err(meta.error("packed structs are not supported: fields may be unaligned"));
            }
            if meta.input.peek(syn::token::Paren) {
                let _args;
                syn::parenthesized!(_args in meta.input);
                _args.parse::<proc_macro2::TokenStream>()?;
            }
            Ok(())
        })?;
    }
    Ok(())
}

/// Tag from `#[retag(tag = "...")]`; the last one wins.
fn field_tag(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut tag = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("retag")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("tag") {
                let value: LitStr = meta.value()?.parse()?;
                tag = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported retag attribute, expected `tag = \"...\"`"))
            }
        })?;
    }
    Ok(tag)
}
