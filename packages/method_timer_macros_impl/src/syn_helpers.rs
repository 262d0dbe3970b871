use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Block, Receiver, Signature, Visibility, parse_quote};

/// Returns the `self` receiver of a function signature, if it has one.
pub(crate) fn receiver(signature: &Signature) -> Option<&Receiver> {
    signature.receiver()
}

/// Whether the item can be seen from outside the type that defines it.
pub(crate) fn is_externally_visible(visibility: &Visibility) -> bool {
    matches!(visibility, Visibility::Public(_) | Visibility::Restricted(_))
}

/// Expression that evaluates to a `&Self` given the receiver of a method.
///
/// By-value receivers (`self`, `mut self`) need a plain reference, while reference and smart
/// pointer receivers (`&self`, `&mut self`, `self: Box<Self>`, ...) need a reborrow through deref.
fn self_reference(receiver: &Receiver) -> TokenStream {
    if receiver.reference.is_none() && receiver.colon_token.is_none() {
        quote!(&self)
    } else {
        quote!(&*self)
    }
}

/// Rewrites a method body so that it runs while the stopwatch named after the method measures.
///
/// The span is a local of the outer block, so it is dropped (stopping the stopwatch) after the
/// original body has produced its value, on every exit path including `return`, `?` and panics.
pub(crate) fn wrap_body(signature: &Signature, receiver: &Receiver, body: &Block) -> Block {
    let method_name = signature.ident.unraw().to_string();
    let self_reference = self_reference(receiver);

    parse_quote! {
        {
            let __method_timer_span = ::method_timer::__private::enter(
                ::method_timer::Timed::timer(#self_reference),
                #method_name,
            );

            #body
        }
    }
}
