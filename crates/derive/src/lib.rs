#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::missing_errors_doc)]

//! Derive macro generating the routing plumbing of a `WebDriver` command.
//!
//! ```ignore
//! #[derive(Debug, WebDriverCommand)]
//! #[webdriver(method = "GET", path = "element/{element}/attribute/{name}", response = "Option<String>")]
//! pub struct GetElementAttribute<'a> {
//!     element: &'a ElementHandle,
//!     name: &'a str,
//! }
//! ```
//!
//! - `method` is one of `GET`, `POST` or `DELETE`.
//! - `path` is relative to the scope the command is sent in. A `{field}` placeholder must span a
//!   whole segment, it becomes the [`Display`](std::fmt::Display) value of the field with the
//!   same name as a single segment, even when that value contains a `/`.
//! - `response` defaults to `<Ident>Response`.
//! - A field named `parameters` becomes the JSON body of the request, its type is used as
//!   the command `Parameters`. Without it, the command is sent without body.
//!
//! The expansion refers to `Command` and `Method`, both must be in scope.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Fields, Ident, LitStr, Type, parse_macro_input};

struct Route {
    method: Ident,
    path: LitStr,
    response: Option<Type>,
}

#[proc_macro_derive(WebDriverCommand, attributes(webdriver))]
pub fn derive_web_driver_command(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let ident = &input.ident;
    let route = parse_route(input)?;
    let (names, types) = fields(input)?;

    let parameters = names
        .iter()
        .position(|name| name == "parameters")
        .map(|index| &types[index]);
    let (parameters_type, parameters_body) = parameters.map_or_else(
        || (quote! { () }, quote! { None }),
        |kind| (quote! { #kind }, quote! { Some(&self.parameters) }),
    );

    let response = route.response.map_or_else(
        || {
            let response = format_ident!("{}Response", ident);
            quote! { #response }
        },
        |response| quote! { #response },
    );

    let path = &route.path;
    let mut segments = Vec::new();
    for segment in path.value().split('/').filter(|segment| !segment.is_empty()) {
        segments.push(match placeholder(segment) {
            Some(name) => {
                let binding = format_ident!("{}", name);
                if !names.contains(&binding) {
                    return Err(syn::Error::new(
                        path.span(),
                        format!("path placeholder `{{{name}}}` has no matching field"),
                    ));
                }
                quote! { ::std::borrow::Cow::Owned(self.#binding.to_string()) }
            },
            None if segment.contains(['{', '}']) => {
                return Err(syn::Error::new(
                    path.span(),
                    format!("path segment `{segment}` mixes a placeholder with literal text"),
                ));
            },
            None => quote! { ::std::borrow::Cow::Borrowed(#segment) },
        });
    }

    let method = &route.method;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics #ident #ty_generics #where_clause {
            #[must_use]
            pub const fn new(#(#names: #types),*) -> Self {
                Self { #(#names),* }
            }
        }

        impl #impl_generics Command for #ident #ty_generics #where_clause {
            type Parameters = #parameters_type;
            type Response = #response;

            const METHOD: Method = Method::#method;

            fn segments(&self) -> ::std::vec::Vec<::std::borrow::Cow<'_, str>> {
                ::std::vec![#(#segments),*]
            }

            fn parameters(&self) -> Option<&Self::Parameters> {
                #parameters_body
            }
        }
    })
}

fn parse_route(input: &DeriveInput) -> syn::Result<Route> {
    let mut method = None;
    let mut path = None;
    let mut response = None;

    for attribute in input
        .attrs
        .iter()
        .filter(|attribute| attribute.path().is_ident("webdriver"))
    {
        attribute.parse_nested_meta(|meta| {
            if meta.path.is_ident("method") {
                let value: LitStr = meta.value()?.parse()?;
                method = Some(match value.value().as_str() {
                    "GET" => format_ident!("Get"),
                    "POST" => format_ident!("Post"),
                    "DELETE" => format_ident!("Delete"),
                    other => return Err(meta.error(format!("unsupported method `{other}`"))),
                });
            } else if meta.path.is_ident("path") {
                path = Some(meta.value()?.parse::<LitStr>()?);
            } else if meta.path.is_ident("response") {
                let value: LitStr = meta.value()?.parse()?;
                response = Some(value.parse::<Type>()?);
            } else {
                return Err(meta.error("expected `method`, `path` or `response`"));
            }

            Ok(())
        })?;
    }

    let missing = |name: &str| {
        syn::Error::new(
            input.ident.span(),
            format!("missing `#[webdriver({name} = \"...\")]` attribute"),
        )
    };

    Ok(Route {
        method: method.ok_or_else(|| missing("method"))?,
        path: path.ok_or_else(|| missing("path"))?,
        response,
    })
}

fn fields(input: &DeriveInput) -> syn::Result<(Vec<Ident>, Vec<Type>)> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new(
            input.ident.span(),
            "WebDriverCommand can only be derived for structs",
        ));
    };

    match &data.fields {
        Fields::Unit => Ok((Vec::new(), Vec::new())),
        Fields::Named(named) => Ok(named
            .named
            .iter()
            .filter_map(|field| field.ident.clone().map(|ident| (ident, field.ty.clone())))
            .unzip()),
        Fields::Unnamed(_) => Err(syn::Error::new(
            input.ident.span(),
            "WebDriverCommand requires named fields",
        )),
    }
}

fn placeholder(segment: &str) -> Option<&str> {
    segment
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
}
