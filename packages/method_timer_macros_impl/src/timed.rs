//! Implementation of the `#[timed]` attribute.

use proc_macro2::TokenStream;
use quote::ToTokens;
use syn::ext::IdentExt;
use syn::parse::Parser;
use syn::{Ident, ImplItem, ImplItemFn, Item, ItemFn, ItemImpl, Signature, meta};

use crate::syn_helpers::{is_externally_visible, receiver, wrap_body};

#[must_use]
pub fn entrypoint(attr: &TokenStream, input: &TokenStream) -> TokenStream {
    let result = parse_arguments(attr).and_then(|arguments| {
        let item = syn::parse2::<Item>(input.clone())?;
        apply(&arguments, item)
    });

    match result {
        Ok(output) => output,
        Err(error) => {
            // Emit the input unchanged next to the error, so the user only sees the error
            // about the attribute and not a cascade of errors about a missing type or method.
            let mut output = error.to_compile_error();
            output.extend(input.clone());
            output
        }
    }
}

/// Arguments accepted by the attribute.
#[derive(Debug, Default)]
struct Arguments {
    /// Explicit list of methods to wrap. `None` means "every qualifying method".
    methods: Option<Vec<Ident>>,
}

fn parse_arguments(attr: &TokenStream) -> syn::Result<Arguments> {
    let mut arguments = Arguments::default();

    let parser = meta::parser(|meta| {
        if meta.path.is_ident("methods") {
            if arguments.methods.is_some() {
                return Err(meta.error("`methods(...)` may only be specified once"));
            }

            let mut methods = Vec::new();
            meta.parse_nested_meta(|nested| {
                methods.push(nested.path.require_ident()?.clone());
                Ok(())
            })?;

            if methods.is_empty() {
                return Err(meta.error("`methods(...)` must list at least one method"));
            }

            arguments.methods = Some(methods);
            Ok(())
        } else {
            Err(meta.error("unsupported argument; expected `methods(name, ...)`"))
        }
    });

    parser.parse2(attr.clone())?;
    Ok(arguments)
}

fn apply(arguments: &Arguments, item: Item) -> syn::Result<TokenStream> {
    match item {
        Item::Impl(item_impl) => apply_to_impl(arguments, item_impl),
        Item::Fn(item_fn) => apply_to_method(arguments, item_fn),
        other => Err(syn::Error::new_spanned(
            other,
            "#[timed] can only be applied to an `impl` block or to a method with a `self` receiver",
        )),
    }
}

fn apply_to_impl(arguments: &Arguments, mut item_impl: ItemImpl) -> syn::Result<TokenStream> {
    if let Some(methods) = &arguments.methods {
        for name in methods {
            ensure_listed_method_exists(&item_impl, name)?;
        }
    }

    // Methods of a trait impl are as visible as the trait itself.
    let is_trait_impl = item_impl.trait_.is_some();

    for impl_item in &mut item_impl.items {
        let ImplItem::Fn(method) = impl_item else {
            continue;
        };

        let qualifies = match &arguments.methods {
            Some(methods) => methods.iter().any(|name| method.sig.ident == *name),
            None => qualifies_by_default(method, is_trait_impl),
        };

        if qualifies {
            wrap_method(method);
        }
    }

    Ok(item_impl.into_token_stream())
}

/// Public, receiver-taking methods whose names do not start with an underscore are timed.
///
/// `const` and `async` methods are skipped.
fn qualifies_by_default(method: &ImplItemFn, is_trait_impl: bool) -> bool {
    (is_trait_impl || is_externally_visible(&method.vis))
        && receiver(&method.sig).is_some()
        && ensure_timeable(&method.sig).is_ok()
        && !method.sig.ident.unraw().to_string().starts_with('_')
}

fn ensure_listed_method_exists(item_impl: &ItemImpl, name: &Ident) -> syn::Result<()> {
    let method = item_impl.items.iter().find_map(|impl_item| match impl_item {
        ImplItem::Fn(method) if method.sig.ident == *name => Some(method),
        _ => None,
    });

    match method {
        None => Err(syn::Error::new_spanned(
            name,
            format!("no method named `{name}` in this `impl` block"),
        )),
        Some(method) if receiver(&method.sig).is_none() => Err(syn::Error::new_spanned(
            name,
            format!("`{name}` has no `self` receiver and cannot be timed"),
        )),
        Some(method) => ensure_timeable(&method.sig),
    }
}

/// Rejects methods whose body cannot host a span.
fn ensure_timeable(signature: &Signature) -> syn::Result<()> {
    if let Some(constness) = &signature.constness {
        return Err(syn::Error::new_spanned(
            constness,
            "const methods cannot be timed because the timer is not usable in constant evaluation",
        ));
    }

    if let Some(asyncness) = &signature.asyncness {
        return Err(syn::Error::new_spanned(
            asyncness,
            "async methods cannot be timed because the span would measure time spent suspended \
             and make the future `!Send`",
        ));
    }

    Ok(())
}

fn wrap_method(method: &mut ImplItemFn) {
    if let Some(receiver) = receiver(&method.sig) {
        method.block = wrap_body(&method.sig, receiver, &method.block);
    }
}

fn apply_to_method(arguments: &Arguments, mut item_fn: ItemFn) -> syn::Result<TokenStream> {
    if let Some(methods) = &arguments.methods {
        let first = methods.first().expect("parser rejects empty method lists");
        return Err(syn::Error::new_spanned(
            first,
            "`methods(...)` is only supported when #[timed] is applied to an `impl` block",
        ));
    }

    let Some(receiver) = receiver(&item_fn.sig) else {
        return Err(syn::Error::new_spanned(
            &item_fn.sig,
            "#[timed] on a function requires a `self` receiver; free functions and associated \
             functions have no timer to record into",
        ));
    };

    ensure_timeable(&item_fn.sig)?;

    *item_fn.block = wrap_body(&item_fn.sig, receiver, &item_fn.block);
    Ok(item_fn.into_token_stream())
}
