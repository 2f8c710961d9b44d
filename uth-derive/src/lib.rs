//! # uth Derive
//!
//! Procedural macros for the uth unit-test helper.
//!
//! ## Macros
//!
//! - `#[uth::group]` - Runs the body of a function inside a group named after it
//! - `#[uth::group("name")]` - Same, with an explicit group name
//! - `#[derive(uth::ToParamString)]` - Reports a fieldless enum by its discriminant
//!
//! These macros are re-exported by the main `uth` crate, so users typically
//! don't need to import this crate directly.

extern crate proc_macro;

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    parse::Parse, parse_macro_input, spanned::Spanned, Data, DeriveInput, FnArg, Fields, Ident,
    ItemFn, LitStr, Pat, ReturnType, Signature, Type,
};

/// Arguments of the group attribute, `#[group]` or `#[group("name")]`.
struct Input {
    name: Option<LitStr>,
}

impl Parse for Input {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        if input.is_empty() {
            return Ok(Input { name: None });
        }
        Ok(Input {
            name: Some(input.parse()?),
        })
    }
}

fn group_name(func: &Ident, input: &Input) -> String {
    match &input.name {
        Some(name) => name.value(),
        None => func.to_string(),
    }
}

/// Find the binding of the `&mut Runner` parameter. It has to be the first
/// parameter after an optional receiver.
fn find_runner(sig: &Signature) -> syn::Result<Ident> {
    if let Some(asyncness) = &sig.asyncness {
        return Err(syn::Error::new(
            asyncness.span(),
            "#[uth::group] cannot be applied to async functions",
        ));
    }

    let missing = || {
        syn::Error::new(
            sig.span(),
            "#[uth::group] requires `&mut Runner` as the first parameter",
        )
    };

    let first = sig
        .inputs
        .iter()
        .find_map(|arg| match arg {
            FnArg::Receiver(_) => None,
            FnArg::Typed(typed) => Some(typed),
        })
        .ok_or_else(missing)?;

    let is_runner = match &*first.ty {
        Type::Reference(reference) if reference.mutability.is_some() => match &*reference.elem {
            Type::Path(path) => path
                .path
                .segments
                .last()
                .is_some_and(|segment| segment.ident == "Runner"),
            _ => false,
        },
        _ => false,
    };
    if !is_runner {
        return Err(syn::Error::new(first.ty.span(), "expected `&mut Runner`"));
    }

    match &*first.pat {
        Pat::Ident(pat) => Ok(pat.ident.clone()),
        other => Err(syn::Error::new(
            other.span(),
            "the `&mut Runner` parameter must be bound to a name",
        )),
    }
}

/// Runs the body of a function inside a group.
///
/// The group is named after the function unless a name is given. The
/// function takes the runner as its first parameter; the group is begun
/// before the body runs and ended after it, also on early `return`.
///
/// ```rust,ignore
/// #[uth::group]
/// fn vector_tests(runner: &mut uth::Runner) {
///     uth::check_eq!(runner, Vec::<i32>::new().len(), 0);
/// }
///
/// #[uth::group("Parsing")]
/// fn parse_tests(runner: &mut uth::Runner) -> eyre::Result<()> {
///     uth::check!(runner, "42".parse::<u8>()? == 42);
///     Ok(())
/// }
/// ```
///
/// # Requirements
///
/// - The first parameter (after `self`, if any) must be `&mut Runner`
/// - Function must not be `async`
#[proc_macro_attribute]
pub fn group(args: TokenStream, input: TokenStream) -> TokenStream {
    let input_args = parse_macro_input!(args as Input);
    let input_fn = parse_macro_input!(input as ItemFn);

    let runner = match find_runner(&input_fn.sig) {
        Ok(runner) => runner,
        Err(e) => return e.to_compile_error().into(),
    };
    let name = group_name(&input_fn.sig.ident, &input_args);

    let ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = input_fn;

    // The body runs in a closure so that `return` and `?` leave the body but
    // still end the group. `impl Trait` cannot be named on a closure.
    let body = match &sig.output {
        ReturnType::Default => quote! { || -> () #block },
        ReturnType::Type(_, ty) if matches!(**ty, Type::ImplTrait(_)) => quote! { || #block },
        ReturnType::Type(_, ty) => quote! { || -> #ty #block },
    };

    let output = quote! {
        #(#attrs)*
        #vis #sig {
            #runner.group_begin(#name);
            #[allow(clippy::redundant_closure_call)]
            let __uth_result = (#body)();
            #runner.group_end();
            __uth_result
        }
    };

    output.into()
}

/// Variants of a fieldless enum.
fn unit_variants(input: &DeriveInput) -> syn::Result<Vec<Ident>> {
    let unsupported = || {
        syn::Error::new(
            input.ident.span(),
            "#[derive(ToParamString)] only supports enums without fields",
        )
    };

    let Data::Enum(data) = &input.data else {
        return Err(unsupported());
    };
    data.variants
        .iter()
        .map(|variant| match variant.fields {
            Fields::Unit => Ok(variant.ident.clone()),
            _ => Err(syn::Error::new(
                variant.fields.span(),
                "#[derive(ToParamString)] only supports enums without fields",
            )),
        })
        .collect::<syn::Result<Vec<_>>>()
        .and_then(|variants| {
            if variants.is_empty() {
                Err(unsupported())
            } else {
                Ok(variants)
            }
        })
}

/// Reports a fieldless enum by its integer discriminant.
///
/// ```rust,ignore
/// #[derive(uth::ToParamString)]
/// enum Mode {
///     Slow = 1,
///     Fast = 3,
/// }
///
/// // A failing `check_fn!(runner, is_slow, Mode::Fast)` reports `3`.
/// ```
#[proc_macro_derive(ToParamString)]
pub fn derive_to_param_string(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let variants = match unit_variants(&input) {
        Ok(variants) => variants,
        Err(e) => return e.to_compile_error().into(),
    };

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let output = quote! {
        impl #impl_generics ::uth::ToParamString for #name #ty_generics #where_clause {
            fn to_param_string(&self) -> ::std::string::String {
                match *self {
                    #(Self::#variants => ::std::string::ToString::to_string(&(Self::#variants as i128)),)*
                }
            }
        }
    };

    output.into()
}

#[cfg(test)]
mod test {
    use super::Input;
    use test_case::test_case;

    #[test_case("enum Mode { Slow = 1, Fast = 3 }" => Some(vec!["Slow".into(), "Fast".into()]); "explicit discriminants")]
    #[test_case("#[repr(u8)] enum Bare { X }" => Some(vec!["X".into()]); "implicit discriminant")]
    #[test_case("enum Shape { Dot, Circle(f32) }" => None; "tuple variant")]
    #[test_case("enum Shape { Rect { w: f32 } }" => None; "struct variant")]
    #[test_case("enum Never {}" => None; "no variant")]
    #[test_case("struct Meters(f32);" => None; "struct")]
    fn unit_variants(s: &str) -> Option<Vec<String>> {
        let input: syn::DeriveInput = syn::parse_str(s).expect("failed to parse item");
        super::unit_variants(&input)
            .ok()
            .map(|variants| variants.iter().map(ToString::to_string).collect())
    }

    #[test_case("fn a(runner: &mut Runner)" => Some("runner".into()); "plain")]
    #[test_case("fn a(r: &mut uth::Runner, x: i32)" => Some("r".into()); "qualified path")]
    #[test_case("fn a(&self, ctx: &mut Runner)" => Some("ctx".into()); "method")]
    #[test_case("fn a(mut runner: &mut Runner)" => Some("runner".into()); "mutable binding")]
    #[test_case("fn a()" => None; "no parameter")]
    #[test_case("fn a(runner: &Runner)" => None; "shared reference")]
    #[test_case("fn a(runner: Runner)" => None; "by value")]
    #[test_case("fn a(x: i32, runner: &mut Runner)" => None; "not first")]
    #[test_case("fn a(_: &mut Runner)" => None; "unnamed")]
    #[test_case("async fn a(runner: &mut Runner)" => None; "async")]
    fn find_runner(s: &str) -> Option<String> {
        let sig: syn::Signature = syn::parse_str(s).expect("failed to parse function signature");
        super::find_runner(&sig).ok().map(|ident| ident.to_string())
    }

    #[test_case("" => "vector_tests"; "function name")]
    #[test_case("\"Vectors\"" => "Vectors"; "explicit name")]
    fn group_name(args: &str) -> String {
        let input: Input = syn::parse_str(args).expect("failed to parse input args");
        let func: syn::Ident = syn::parse_str("vector_tests").expect("failed to parse ident");
        super::group_name(&func, &input)
    }

    #[test]
    fn invalid_args() {
        assert!(syn::parse_str::<Input>("42").is_err());
    }
}
