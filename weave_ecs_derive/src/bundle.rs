use proc_macro::TokenStream;
use syn::{Data, DeriveInput, Field, Fields, Ident};
use quote::quote;

pub fn impl_bundle(ast: &DeriveInput) -> TokenStream {
    let name = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    let fields = match &ast.data {
        Data::Struct(data) => &data.fields,
        _ => {
            return syn::Error::new_spanned(name, "Bundle can only be derived for structs")
                .to_compile_error()
                .into();
        },
    };

    let mut types = Vec::new();
    let mut members = Vec::new();
    let iter: Box<dyn Iterator<Item = (usize, &Field)>> = match fields {
        Fields::Named(named) => Box::new(named.named.iter().enumerate()),
        Fields::Unnamed(unnamed) => Box::new(unnamed.unnamed.iter().enumerate()),
        Fields::Unit => Box::new(std::iter::empty()),
    };

    for (index, field) in iter {
        match is_skipped(field) {
            Ok(true) => continue,
            Ok(false) => {},
            Err(err) => return err.to_compile_error().into(),
        }

        types.push(field.ty.clone());
        members.push(match &field.ident {
            Some(ident) => quote!(#ident),
            None => {
                let index = syn::Index::from(index);
                quote!(#index)
            },
        });
    }

    let gen = quote! {
        impl #impl_generics weave_ecs::components::ComponentBundle for #name #ty_generics #where_clause {
            fn component_types() -> ::std::vec::Vec<weave_ecs::components::ComponentType> {
                ::std::vec![#(weave_ecs::components::ComponentType::of_component::<#types>()),*]
            }

            #[allow(unused_variables)]
            fn insert_into(
                self,
                store: &mut weave_ecs::components::ComponentStore,
                entity: weave_ecs::entities::Entity,
            ) {
                #(store.insert(entity, self.#members);)*
            }
        }
    };
    gen.into()
}

fn is_skipped(field: &Field) -> syn::Result<bool> {
    for attr in field.attrs.iter().filter(|a| a.path.is_ident("bundle")) {
        let flag: Ident = attr.parse_args()?;
        if flag != "skip" {
            return Err(syn::Error::new_spanned(flag, "expected `skip`"));
        }
        return Ok(true);
    }
    Ok(false)
}
