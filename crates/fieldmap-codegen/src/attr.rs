use proc_macro2::Span;
use syn::spanned::Spanned;
use syn::{Attribute, Lit, LitStr, Meta, MetaNameValue};
use thiserror::Error;

pub const ATTR_NAME: &str = "map";

#[derive(Debug, Clone, Error)]
pub enum Error {
  #[error("Expected: map = \"<Type>:<field>;...\"")]
  InvalidSyntax(Span),
  #[error("Duplicate `map` attribute.")]
  Duplicate(Span),
}

impl Error {
  pub fn span(&self) -> Span {
    match *self {
      Error::InvalidSyntax(span) | Error::Duplicate(span) => span,
    }
  }
}

/// The raw `map` annotation of a field, if it has one.
///
/// The annotation is kept as written; entries are parsed when mapping.
pub fn annotation(attrs: &[Attribute]) -> Result<Option<LitStr>, Error> {
  let mut found = None;
  for attr in attrs.iter().filter(|attr| attr.path.is_ident(ATTR_NAME)) {
    if found.is_some() {
      return Err(Error::Duplicate(attr.span()));
    }
    let lit = match attr.parse_meta() {
      // #[map = "Target:field"]
      Ok(Meta::NameValue(MetaNameValue {
        lit: Lit::Str(lit), ..
      })) => lit,
      _ => return Err(Error::InvalidSyntax(attr.span())),
    };
    found = Some(lit);
  }
  Ok(found)
}

#[cfg(test)]
fn field(input: syn::DeriveInput) -> syn::Field {
  match input.data {
    syn::Data::Struct(data) => data.fields.into_iter().next().unwrap(),
    _ => unreachable!(),
  }
}

#[test]
fn test_annotation() {
  let field = field(syn::parse_quote! {
    struct Source {
      #[doc = "ignored"]
      #[map = "Target:a;Target2:a"]
      a_field: String,
    }
  });
  let lit = annotation(&field.attrs).unwrap().unwrap();
  assert_eq!(lit.value(), "Target:a;Target2:a");
}

#[test]
fn test_no_annotation() {
  let field = field(syn::parse_quote! {
    struct Source {
      g_field: String,
    }
  });
  assert!(annotation(&field.attrs).unwrap().is_none());
}

#[test]
fn test_invalid_annotation() {
  let fields = vec![
    field(syn::parse_quote!(struct S { #[map] a: String })),
    field(syn::parse_quote!(struct S { #[map(Target = "a")] a: String })),
    field(syn::parse_quote!(struct S { #[map = 1] a: String })),
  ];
  for field in fields {
    assert!(matches!(annotation(&field.attrs), Err(Error::InvalidSyntax(_))));
  }

  let field = field(syn::parse_quote! {
    struct S {
      #[map = "Target:a"]
      #[map = "Target2:a"]
      a: String,
    }
  });
  assert!(matches!(annotation(&field.attrs), Err(Error::Duplicate(_))));
}
