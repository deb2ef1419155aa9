use crate::attr;
use crate::kind::kind_tokens;
use proc_macro2::TokenStream;
use proc_macro_error::{abort, abort_call_site, diagnostic, Level, ResultExt};
use quote::{quote, ToTokens};
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, LitStr};

#[derive(Debug)]
pub struct Derive {
  ident: syn::Ident,
  fields: Vec<RecordField>,
}

impl Derive {
  pub fn from_derive_input(input: &DeriveInput) -> Self {
    if !input.generics.params.is_empty() {
      abort!(input.generics, "Generic records are not supported.");
    }

    let fields = match input.data {
      Data::Struct(ref data) => match data.fields {
        Fields::Named(ref fields) => fields.named.iter().map(RecordField::from_field).collect(),
        _ => abort!(data.fields, "Only support named fields."),
      },
      _ => {
        abort_call_site!("Only support struct.");
      }
    };

    Self {
      ident: input.ident.clone(),
      fields,
    }
  }
}

impl ToTokens for Derive {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let self_ident = &self.ident;
    let descriptors: Vec<_> = self.fields.iter().map(RecordField::descriptor_tokens).collect();
    let ref_arms: Vec<_> = self
      .fields
      .iter()
      .map(|field| {
        let name = &field.name;
        let ident = &field.ident;
        quote! {
          #name => ::core::option::Option::Some(&self.#ident as &dyn ::core::any::Any)
        }
      })
      .collect();
    let mut_arms: Vec<_> = self
      .fields
      .iter()
      .map(|field| {
        let name = &field.name;
        let ident = &field.ident;
        quote! {
          #name => ::core::option::Option::Some(&mut self.#ident as &mut dyn ::core::any::Any)
        }
      })
      .collect();

    tokens.extend(quote! {
      impl ::fieldmap::Record for #self_ident {
        fn type_path(&self) -> &'static str {
          ::core::any::type_name::<Self>()
        }

        fn fields(&self) -> ::std::vec::Vec<::fieldmap::FieldDescriptor> {
          ::std::vec![#(#descriptors),*]
        }

        fn field(&self, name: &str) -> ::core::option::Option<&dyn ::core::any::Any> {
          match name {
            #(#ref_arms,)*
            _ => ::core::option::Option::None,
          }
        }

        fn field_mut(&mut self, name: &str) -> ::core::option::Option<&mut dyn ::core::any::Any> {
          match name {
            #(#mut_arms,)*
            _ => ::core::option::Option::None,
          }
        }
      }
    });
  }
}

#[derive(Debug)]
struct RecordField {
  ident: syn::Ident,
  // `r#type` is named `type`
  name: String,
  ty: syn::Type,
  annotation: Option<LitStr>,
}

impl RecordField {
  fn from_field(field: &syn::Field) -> Self {
    let ident = match field.ident {
      Some(ref ident) => ident.clone(),
      None => abort!(field, "Only support named fields."),
    };
    let annotation = attr::annotation(&field.attrs)
      .map_err(|err| diagnostic!(err.span(), Level::Error, err))
      .expect_or_abort("`map` attribute");

    Self {
      name: ident.unraw().to_string(),
      ident,
      ty: field.ty.clone(),
      annotation,
    }
  }

  // `FieldDescriptor::new(..)`
  fn descriptor_tokens(&self) -> TokenStream {
    let name = &self.name;
    let ty = &self.ty;
    let kind = kind_tokens(ty);
    let annotation = match self.annotation {
      Some(ref lit) => quote!(::core::option::Option::Some(#lit)),
      None => quote!(::core::option::Option::None),
    };
    quote! {
      ::fieldmap::FieldDescriptor::new(
        #name,
        ::fieldmap::TypeInfo::of::<#ty>(),
        #kind,
        #annotation
      )
    }
  }
}

#[test]
fn test_descriptor_tokens() {
  let input: DeriveInput = syn::parse_quote! {
    struct Source {
      #[map = "Target:a"]
      a_field: String,
      r#type: i32,
    }
  };
  let derive = Derive::from_derive_input(&input);
  assert_eq!(derive.fields.len(), 2);
  assert_eq!(derive.fields[1].name, "type");

  let expected = quote! {
    ::fieldmap::FieldDescriptor::new(
      "a_field",
      ::fieldmap::TypeInfo::of::<String>(),
      {
        #[allow(unused_imports)]
        use ::fieldmap::__private::{MapKindOf as _, ScalarKindOf as _};
        (&&::fieldmap::__private::KindOf::<String>::new()).value_kind()
      },
      ::core::option::Option::Some("Target:a")
    )
  };
  assert_eq!(
    derive.fields[0].descriptor_tokens().to_string(),
    expected.to_string()
  );
}
