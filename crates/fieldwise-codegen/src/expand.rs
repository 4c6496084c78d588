use crate::schema::{Tag, Variant};

use proc_macro2::TokenStream;
use quote::quote;

pub(super) fn tag(tag: &Tag) -> TokenStream {
    let fieldwise = quote!(_fieldwise::codegen_support);
    let ident = &tag.ident;
    let name = &tag.name;

    let infos = tag.variants.iter().map(|variant| field_info(&fieldwise, variant));
    let idents: Vec<_> = tag.variants.iter().map(|variant| &variant.ident).collect();
    let ordinals: Vec<_> = tag.variants.iter().map(|variant| variant.ordinal).collect();

    wrap_in_const(quote! {
        impl #fieldwise::FieldTag for #ident {
            fn schema() -> &'static #fieldwise::TagSchema {
                static SCHEMA: #fieldwise::TagSchema = #fieldwise::TagSchema {
                    name: #name,
                    fields: &[ #( #infos, )* ],
                };
                &SCHEMA
            }

            fn ordinal(self) -> usize {
                match self {
                    #( Self::#idents => #ordinals, )*
                }
            }

            fn from_ordinal(ordinal: usize) -> #fieldwise::Option<Self> {
                match ordinal {
                    #( #ordinals => #fieldwise::Option::Some(Self::#idents), )*
                    _ => #fieldwise::Option::None,
                }
            }
        }
    })
}

fn field_info(fieldwise: &TokenStream, variant: &Variant) -> TokenStream {
    let name = &variant.name;

    let nested = match &variant.nested {
        Some(ty) => quote! {
            #fieldwise::Option::Some(
                <#ty as #fieldwise::FieldTag>::schema as fn() -> &'static #fieldwise::TagSchema
            )
        },
        None => quote!(#fieldwise::Option::None),
    };

    quote! {
        #fieldwise::FieldInfo {
            name: #name,
            nested: #nested,
        }
    }
}

fn wrap_in_const(code: TokenStream) -> TokenStream {
    quote! {
        const _: () = {
            use fieldwise as _fieldwise;
            #code
        };
    }
}
