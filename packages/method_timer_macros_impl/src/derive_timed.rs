//! Implementation of `#[derive(Timed)]`.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Index, Member};

#[must_use]
pub fn entrypoint(input: &TokenStream) -> TokenStream {
    let result = syn::parse2::<DeriveInput>(input.clone()).and_then(|input| expand(&input));

    match result {
        Ok(output) => output,
        Err(error) => error.to_compile_error(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let member = timer_member(input)?;

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::method_timer::Timed for #ident #ty_generics #where_clause {
            #[inline]
            fn timer(&self) -> &::method_timer::Timer {
                &self.#member
            }
        }
    })
}

/// Finds the field that holds the timer.
///
/// A field marked `#[timer]` wins. Without a marker, a named field called `timer` is used.
fn timer_member(input: &DeriveInput) -> syn::Result<Member> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "#[derive(Timed)] can only be used on structs",
        ));
    };

    let mut marked = None;

    for (index, field) in data.fields.iter().enumerate() {
        let Some(attr) = field.attrs.iter().find(|attr| attr.path().is_ident("timer")) else {
            continue;
        };

        attr.meta.require_path_only()?;

        if marked.is_some() {
            return Err(syn::Error::new_spanned(
                attr,
                "only one field can be marked with #[timer]",
            ));
        }

        marked = Some(match &field.ident {
            Some(ident) => Member::Named(ident.clone()),
            None => Member::Unnamed(Index::from(index)),
        });
    }

    if let Some(member) = marked {
        return Ok(member);
    }

    let named_timer = match &data.fields {
        Fields::Named(fields) => fields
            .named
            .iter()
            .filter_map(|field| field.ident.as_ref())
            .find(|ident| *ident == "timer"),
        Fields::Unnamed(_) | Fields::Unit => None,
    };

    named_timer
        .map(|ident| Member::Named(ident.clone()))
        .ok_or_else(|| {
            syn::Error::new_spanned(
                &input.ident,
                "#[derive(Timed)] requires a field named `timer` or a field marked with #[timer]",
            )
        })
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use syn::ItemImpl;

    use super::*;

    fn normalize(tokens: &TokenStream) -> String {
        tokens
            .to_string()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect()
    }

    fn expand_ok(input: TokenStream) -> String {
        let output = entrypoint(&input);

        // Must be a well-formed impl block.
        syn::parse2::<ItemImpl>(output.clone()).unwrap();

        normalize(&output)
    }

    #[test]
    fn field_named_timer() {
        let output = expand_ok(quote! {
            struct Model {
                weights: Vec<f64>,
                timer: Timer,
            }
        });

        assert!(output.contains("impl::method_timer::TimedforModel"), "{output}");
        assert!(output.contains("&self.timer"), "{output}");
    }

    #[test]
    fn marked_field_wins_over_name() {
        let output = expand_ok(quote! {
            struct Model {
                timer: u32,
                #[timer]
                stopwatches: Timer,
            }
        });

        assert!(output.contains("&self.stopwatches"), "{output}");
    }

    #[test]
    fn marked_tuple_field() {
        let output = expand_ok(quote! {
            struct Wrapper(Vec<u8>, #[timer] Timer);
        });

        assert!(output.contains("&self.1"), "{output}");
    }

    #[test]
    fn generics_are_forwarded() {
        let output = expand_ok(quote! {
            struct Model<'a, T: Clone> where T: Default {
                data: &'a [T],
                timer: Timer,
            }
        });

        assert!(
            output.contains("impl<'a,T:Clone>::method_timer::TimedforModel<'a,T>whereT:Default"),
            "{output}"
        );
    }

    #[test]
    fn missing_timer_field() {
        let output = entrypoint(&quote! {
            struct Model {
                weights: Vec<f64>,
            }
        })
        .to_string();

        assert!(output.contains("compile_error"), "{output}");
        assert!(output.contains("requires a field named `timer`"), "{output}");
    }

    #[test]
    fn unmarked_tuple_struct() {
        let output = entrypoint(&quote!(struct Wrapper(Timer);)).to_string();

        assert!(output.contains("requires a field named `timer`"), "{output}");
    }

    #[test]
    fn multiple_marked_fields() {
        let output = entrypoint(&quote! {
            struct Model {
                #[timer]
                a: Timer,
                #[timer]
                b: Timer,
            }
        })
        .to_string();

        assert!(output.contains("only one field"), "{output}");
    }

    #[test]
    fn marker_takes_no_arguments() {
        let output = entrypoint(&quote! {
            struct Model {
                #[timer(main)]
                a: Timer,
            }
        })
        .to_string();

        assert!(output.contains("compile_error"), "{output}");
    }

    #[test]
    fn enums_are_rejected() {
        let output = entrypoint(&quote! {
            enum Model {
                A,
            }
        })
        .to_string();

        assert!(output.contains("can only be used on structs"), "{output}");
    }
}
