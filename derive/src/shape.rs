use proc_macro::TokenStream;
use quote::{quote, ToTokens};
use syn::{
    parse_macro_input, Attribute, Data, DeriveInput, Fields, Lit, Meta, MetaNameValue, NestedMeta,
};

#[derive(Debug, Default)]
struct TypeAttribs {
    tag: Option<String>,
}

#[derive(Debug, Default)]
struct FieldAttribs {
    skip: bool,
    location: Option<String>,
    rename: Option<String>,
    always_serialize: bool,
    symbol: bool,
    scalar: bool,
    lazy: Option<String>,
}

pub fn derive_shape(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    let attribs = parse_type_attribs(&ast.attrs);
    let name = &ast.ident;
    let tag = attribs.tag.unwrap_or_else(|| name.to_string());
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();
    let fields = match ast.data {
        Data::Struct(data) => match data.fields {
            Fields::Named(fields) => fields.named.into_iter().collect::<Vec<_>>(),
            Fields::Unit => vec![],
            Fields::Unnamed(_) => {
                panic!("WireShape can be derived only for structs with named fields")
            }
        },
        _ => panic!("WireShape can be derived only for structs"),
    };
    let properties = fields
        .iter()
        .filter_map(|field| {
            let attribs = parse_field_attribs(&field.attrs);
            if attribs.skip {
                return None;
            }
            let name = field.ident.as_ref().unwrap();
            let ty = &field.ty;
            let descriptor = if let Some(lazy) = &attribs.lazy {
                quote! { TypeDescriptor::lazy_named_mapping(#lazy) }
            } else if attribs.symbol {
                quote! { TypeDescriptor::Symbol }
            } else if attribs.scalar {
                quote! { TypeDescriptor::Scalar }
            } else {
                quote! { <#ty as DescribeType>::describe() }
            };
            let location = attribs.location.as_ref().map(|location| {
                quote! { .located_in(#location) }
            });
            let rename = attribs.rename.as_ref().map(|rename| {
                quote! { .renamed(#rename) }
            });
            let always_serialize = attribs.always_serialize;
            Some(quote! {
                shape.with(Property::new(
                    stringify!(#name),
                    #descriptor,
                    PropertyOptions::default()
                        #location
                        #rename
                        .always_serialize(#always_serialize),
                ));
            })
        })
        .collect::<Vec<proc_macro2::TokenStream>>();
    quote! {
        impl #impl_generics wire_shape::WireShape for #name #ty_generics #where_clause {
            #[allow(unused_imports, unused_mut)]
            fn shape() -> wire_shape::Shape {
                use wire_shape::{
                    property::{Property, PropertyOptions},
                    shape::Shape,
                    types::{DescribeType, TypeDescriptor},
                };
                let mut shape = Shape::new(#tag);
                #( #properties )*
                shape
            }
        }

        impl #impl_generics wire_shape::DescribeType for #name #ty_generics #where_clause {
            fn describe() -> wire_shape::TypeDescriptor {
                wire_shape::TypeDescriptor::structural(#tag)
            }
        }
    }
    .into()
}

fn parse_type_attribs(attrs: &[Attribute]) -> TypeAttribs {
    let mut result = TypeAttribs::default();
    for attrib in attrs {
        if !attrib.path.is_ident("wire") {
            continue;
        }
        match attrib.parse_meta() {
            Err(error) => panic!(
                "Could not parse attribute `{}`: {:?}",
                attrib.to_token_stream(),
                error
            ),
            Ok(Meta::List(meta)) => {
                for meta in meta.nested {
                    if let NestedMeta::Meta(Meta::NameValue(MetaNameValue {
                        path,
                        lit: Lit::Str(lit),
                        ..
                    })) = &meta
                    {
                        if path.is_ident("tag") {
                            result.tag = Some(lit.value());
                        }
                    }
                }
            }
            _ => {}
        }
    }
    result
}

fn parse_field_attribs(attrs: &[Attribute]) -> FieldAttribs {
    let mut result = FieldAttribs::default();
    for attrib in attrs {
        if !attrib.path.is_ident("wire") {
            continue;
        }
        match attrib.parse_meta() {
            Err(error) => panic!(
                "Could not parse attribute `{}`: {:?}",
                attrib.to_token_stream(),
                error
            ),
            Ok(Meta::List(meta)) => {
                for meta in meta.nested {
                    if let NestedMeta::Meta(meta) = &meta {
                        match meta {
                            Meta::Path(path) => {
                                if path.is_ident("skip") {
                                    result.skip = true;
                                } else if path.is_ident("always_serialize") {
                                    result.always_serialize = true;
                                } else if path.is_ident("symbol") {
                                    result.symbol = true;
                                } else if path.is_ident("scalar") {
                                    result.scalar = true;
                                }
                            }
                            Meta::NameValue(MetaNameValue {
                                path,
                                lit: Lit::Str(lit),
                                ..
                            }) => {
                                if path.is_ident("location") {
                                    result.location = Some(lit.value());
                                } else if path.is_ident("rename") {
                                    result.rename = Some(lit.value());
                                } else if path.is_ident("lazy") {
                                    result.lazy = Some(lit.value());
                                }
                            }
                            _ => {}
                        }
                    }
                }
            }
            _ => {}
        }
    }
    result
}
