use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, parse_quote};

use crate::attribute_parser::{field_options, member_name};

struct Member<'a> {
    ident: &'a syn::Ident,
    ty: &'a syn::Type,
    name: String,
}

fn collect_members(input: &DeriveInput) -> syn::Result<Vec<Member<'_>>> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Filterable can only be derived for structs",
        ));
    };
    let Fields::Named(named) = &data.fields else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Filterable only supports structs with named fields",
        ));
    };

    let mut members: Vec<Member<'_>> = Vec::new();
    for field in &named.named {
        let options = field_options(field)?;
        if options.skip {
            continue;
        }
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let name = options.rename.unwrap_or_else(|| member_name(ident));
        // Lookup is case-insensitive, so names differing only in case collide.
        if members.iter().any(|m| m.name.eq_ignore_ascii_case(&name)) {
            return Err(syn::Error::new_spanned(
                field,
                format!("duplicate filterable member '{name}'"),
            ));
        }
        members.push(Member {
            ident,
            ty: &field.ty,
            name,
        });
    }
    Ok(members)
}

pub(crate) fn expand_filterable(input: &DeriveInput) -> syn::Result<TokenStream> {
    let members = collect_members(input)?;
    let name = &input.ident;

    let mut generics = input.generics.clone();
    if !input.generics.params.is_empty() {
        let where_clause = generics.make_where_clause();
        for member in &members {
            let ty = member.ty;
            where_clause
                .predicates
                .push(parse_quote!(#ty: ::crudfilter::FieldType));
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let field_arms = members.iter().map(|m| {
        let ident = m.ident;
        let canonical = &m.name;
        quote! {
            #canonical => ::core::option::Option::Some(
                ::crudfilter::FieldType::to_field(&self.#ident)
            ),
        }
    });

    let member_checks = members.iter().map(|m| {
        let ty = m.ty;
        let canonical = &m.name;
        quote! {
            if name.eq_ignore_ascii_case(#canonical) {
                return ::core::option::Option::Some(
                    ::crudfilter::FieldMeta::of::<#ty>(#canonical)
                );
            }
        }
    });

    Ok(quote! {
        impl #impl_generics ::crudfilter::Record for #name #ty_generics #where_clause {
            fn field(&self, name: &str) -> ::core::option::Option<::crudfilter::FieldRef<'_>> {
                match name {
                    #(#field_arms)*
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl #impl_generics ::crudfilter::Filterable for #name #ty_generics #where_clause {
            fn member(name: &str) -> ::core::option::Option<::crudfilter::FieldMeta> {
                #(#member_checks)*
                ::core::option::Option::None
            }
        }

        impl #impl_generics ::crudfilter::FieldType for #name #ty_generics #where_clause {
            fn field_kind() -> ::crudfilter::FieldKind {
                ::crudfilter::FieldKind::Object(<Self as ::crudfilter::Filterable>::member)
            }

            fn to_field(&self) -> ::crudfilter::FieldRef<'_> {
                ::crudfilter::FieldRef::Object(self)
            }
        }

        impl #impl_generics ::crudfilter::DeclaredType for #name #ty_generics #where_clause {
            fn property_type() -> ::crudfilter::PropertyType {
                ::crudfilter::PropertyType::record()
            }
        }
    })
}
