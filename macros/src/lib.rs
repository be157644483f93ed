//! Procedural macros for marking methods as deprecated.
//!
//! # Example
//!
//! ```rust,ignore
//! use dont::{deprecations, dont_use};
//!
//! #[deprecations(handler = "exception")]
//! impl Car {
//!     fn drive_autopilot(&self) {}
//!
//!     #[dont_use]
//!     fn drive_manually(&self) {}
//! }
//!
//! // Marked methods now return dont::Result<T>
//! assert!(Car.drive_manually().is_err());
//! ```
//!
//! Methods can also be listed on the impl block:
//!
//! ```rust,ignore
//! #[deprecations(handler = "log_deprecated_call", dont_use(shout))]
//! impl Loudspeaker {
//!     fn shout(&self, msg: &str) -> String {
//!         msg.to_uppercase()
//!     }
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::{TokenStream as TokenStream2, TokenTree};
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::punctuated::Punctuated;
use syn::{
    parse_macro_input, parse_quote, Attribute, Block, FnArg, GenericParam, Ident, ImplItem,
    ImplItemFn, ItemImpl, Meta, ReturnType, Token, Type, Visibility,
};

/// Routes marked methods of an impl block through a deprecation handler.
///
/// # Attributes
/// - `handler = "name"` - Registered handler to call (optional, defaults to the configured default)
/// - `name = "Name"` - Type name reported to handlers (optional, defaults to the type's last path segment)
/// - `dont_use(a, b)` - Methods to mark, as an alternative to `#[dont_use]`
///
/// Each marked method keeps its name, visibility and parameters but returns
/// `dont::Result<T>`: the handler runs first, and only if it succeeds is the
/// original body called. The original body stays available under a private
/// `__dont_<method>` alias.
#[proc_macro_attribute]
pub fn deprecations(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as DeprecationsArgs);
    let input = parse_macro_input!(item as ItemImpl);

    expand_deprecations(args, input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Marks a method as deprecated.
///
/// Only meaningful inside an impl block annotated with `#[deprecations]`,
/// which consumes it.
#[proc_macro_attribute]
pub fn dont_use(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let item = TokenStream2::from(item);
    let error = syn::Error::new_spanned(
        &item,
        "#[dont_use] must be used inside an impl block annotated with #[deprecations]",
    )
    .into_compile_error();
    quote!(#error #item).into()
}

struct DeprecationsArgs {
    handler: Option<String>,
    name: Option<String>,
    dont_use: Vec<Ident>,
}

impl syn::parse::Parse for DeprecationsArgs {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let mut handler = None;
        let mut name = None;
        let mut dont_use: Vec<Ident> = Vec::new();

        while !input.is_empty() {
            let ident: Ident = input.parse()?;

            match ident.to_string().as_str() {
                "handler" => {
                    input.parse::<Token![=]>()?;
                    let value: syn::LitStr = input.parse()?;
                    handler = Some(value.value());
                }
                "name" => {
                    input.parse::<Token![=]>()?;
                    let value: syn::LitStr = input.parse()?;
                    name = Some(value.value());
                }
                "dont_use" => {
                    let content;
                    syn::parenthesized!(content in input);
                    let methods = Punctuated::<Ident, Token![,]>::parse_terminated(&content)?;
                    for method in methods {
                        if dont_use.contains(&method) {
                            return Err(syn::Error::new(
                                method.span(),
                                format!("`{}` is already marked as deprecated", method.unraw()),
                            ));
                        }
                        dont_use.push(method);
                    }
                }
                _ => return Err(syn::Error::new(ident.span(), "unknown attribute")),
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(DeprecationsArgs {
            handler,
            name,
            dont_use,
        })
    }
}

fn expand_deprecations(args: DeprecationsArgs, mut input: ItemImpl) -> syn::Result<TokenStream2> {
    if let Some((_, path, _)) = &input.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "#[deprecations] must be placed on an inherent impl block",
        ));
    }

    let type_name = match args.name {
        Some(name) => name,
        None => type_name(&input.self_ty)?,
    };

    // Methods marked in place
    let mut marked: Vec<Ident> = Vec::new();
    for item in &input.items {
        if let ImplItem::Fn(method) = item {
            let mut marks = method
                .attrs
                .iter()
                .filter(|attr| is_dont_use(attr));
            if let Some(attr) = marks.next() {
                if !matches!(attr.meta, Meta::Path(_)) {
                    return Err(syn::Error::new_spanned(attr, "#[dont_use] takes no arguments"));
                }
                if let Some(again) = marks.next() {
                    return Err(syn::Error::new_spanned(
                        again,
                        format!(
                            "`{}` is already marked as deprecated",
                            method.sig.ident.unraw()
                        ),
                    ));
                }
                marked.push(method.sig.ident.clone());
            }
        }
    }

    // Methods listed on the impl block
    for method in &args.dont_use {
        if marked.contains(method) {
            return Err(syn::Error::new(
                method.span(),
                format!("`{}` is already marked as deprecated", method.unraw()),
            ));
        }
        let defined = input
            .items
            .iter()
            .any(|item| matches!(item, ImplItem::Fn(f) if &f.sig.ident == method));
        if !defined {
            return Err(syn::Error::new(
                method.span(),
                format!("no method named `{}` in this impl block", method.unraw()),
            ));
        }
        marked.push(method.clone());
    }

    let mut items = Vec::with_capacity(input.items.len() + marked.len());
    for item in std::mem::take(&mut input.items) {
        match item {
            ImplItem::Fn(method) if marked.contains(&method.sig.ident) => {
                let (wrapper, original) = split_method(method)?;
                items.push(ImplItem::Fn(wrapper));
                items.push(ImplItem::Fn(original));
            }
            other => items.push(other),
        }
    }
    input.items = items;

    let handler = match &args.handler {
        Some(handler) => quote!(::core::option::Option::Some(#handler)),
        None => quote!(::core::option::Option::None),
    };
    let methods: Vec<String> = marked.iter().map(|m| m.unraw().to_string()).collect();

    let mut generics = input.generics.clone();
    generics
        .make_where_clause()
        .predicates
        .push(parse_quote!(Self: 'static));
    let (impl_generics, _, where_clause) = generics.split_for_impl();
    let self_ty = &input.self_ty;

    Ok(quote! {
        #input

        impl #impl_generics ::dont::Deprecate for #self_ty #where_clause {
            const NAME: &'static str = #type_name;
            const HANDLER: ::core::option::Option<&'static str> = #handler;
            const DEPRECATED: &'static [&'static str] = &[#(#methods),*];
        }

        ::dont::inventory::submit! {
            ::dont::Registration::new(#type_name, #handler, &[#(#methods),*])
        }
    })
}

/// Split a marked method into the intercepting wrapper and the renamed original.
fn split_method(mut method: ImplItemFn) -> syn::Result<(ImplItemFn, ImplItemFn)> {
    method.attrs.retain(|attr| !is_dont_use(attr));

    let name = method.sig.ident.clone();
    if method.sig.receiver().is_none() {
        return Err(syn::Error::new_spanned(
            &method.sig,
            format!(
                "`{}` has no receiver; only methods can be marked as deprecated",
                name.unraw()
            ),
        ));
    }
    let alias = format_ident!("__dont_{}", name.unraw());
    let method_name = name.unraw().to_string();

    let mut original = method.clone();
    original.sig.ident = alias.clone();
    original.vis = Visibility::Inherited;
    original.defaultness = None;
    original.attrs.retain(|attr| !attr.path().is_ident("doc"));
    original.attrs.push(parse_quote!(#[doc(hidden)]));

    // Patterns may destructure, so forward under fresh names
    let mut sig = method.sig;
    let mut forwarded = Vec::new();
    for (index, arg) in sig.inputs.iter_mut().enumerate() {
        if let FnArg::Typed(pat_type) = arg {
            let ident = format_ident!("__dont_arg{}", index);
            pat_type.pat = Box::new(parse_quote!(#ident));
            forwarded.push(ident);
        }
    }

    let output = match &sig.output {
        ReturnType::Default => quote!(()),
        ReturnType::Type(_, ty) => quote!(#ty),
    };
    sig.output = parse_quote!(-> ::dont::Result<#output>);

    let await_original = if sig.asyncness.is_some() {
        quote!(.await)
    } else {
        quote!()
    };

    let turbofish = generic_args(&sig);

    let block: Block = parse_quote!({
        ::dont::intercept::<Self>(::core::borrow::Borrow::<Self>::borrow(&self), #method_name)?;
        ::core::result::Result::Ok(Self::#alias #turbofish (self, #(#forwarded),*) #await_original)
    });

    let wrapper = ImplItemFn {
        attrs: method.attrs,
        vis: method.vis,
        defaultness: None,
        sig,
        block,
    };

    Ok((wrapper, original))
}

/// `#[dont_use]` or a path ending in it, e.g. `#[dont::dont_use]`.
fn is_dont_use(attr: &Attribute) -> bool {
    attr.path()
        .segments
        .last()
        .is_some_and(|segment| segment.ident == "dont_use")
}

/// Explicit `::<..>` for the call to the original, so type and const
/// parameters that cannot be inferred still resolve.
///
/// Empty when the method has no such parameters, or takes `impl Trait`
/// arguments, which cannot be combined with explicit arguments everywhere.
fn generic_args(sig: &syn::Signature) -> TokenStream2 {
    let args: Vec<&Ident> = sig
        .generics
        .params
        .iter()
        .filter_map(|param| match param {
            GenericParam::Type(ty) => Some(&ty.ident),
            GenericParam::Const(konst) => Some(&konst.ident),
            GenericParam::Lifetime(_) => None,
        })
        .collect();

    let impl_trait_arg = sig.inputs.iter().any(|arg| match arg {
        FnArg::Typed(pat_type) => mentions_impl(quote!(#pat_type)),
        FnArg::Receiver(_) => false,
    });

    if args.is_empty() || impl_trait_arg {
        quote!()
    } else {
        quote!(::<#(#args),*>)
    }
}

fn mentions_impl(tokens: TokenStream2) -> bool {
    tokens.into_iter().any(|tree| match tree {
        TokenTree::Ident(ident) => ident == "impl",
        TokenTree::Group(group) => mentions_impl(group.stream()),
        _ => false,
    })
}

fn type_name(ty: &Type) -> syn::Result<String> {
    match ty {
        Type::Path(path) if path.qself.is_none() => path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.unraw().to_string())
            .ok_or_else(|| syn::Error::new_spanned(ty, "expected a type name")),
        _ => Err(syn::Error::new_spanned(
            ty,
            "cannot derive a type name here; pass `name = \"...\"`",
        )),
    }
}
