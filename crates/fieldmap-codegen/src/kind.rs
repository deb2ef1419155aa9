use proc_macro2::TokenStream;
use quote::quote;
use syn::Type;

/// Expression for the `ValueKind` of a field.
///
/// The kind is picked by the compiler from the resolved type, so a field
/// declared through a type alias gets the kind of the aliased type. A
/// `SharedMap<K, V>` with cloneable `K` and `V` is a map; everything else is
/// classified by its `TypeId`.
pub fn kind_tokens(ty: &Type) -> TokenStream {
  quote! {
    {
      #[allow(unused_imports)]
      use ::fieldmap::__private::{MapKindOf as _, ScalarKindOf as _};
      (&&::fieldmap::__private::KindOf::<#ty>::new()).value_kind()
    }
  }
}

#[test]
fn test_kind_tokens() {
  let ty: Type = syn::parse_quote!(Tags);
  let expected = quote! {
    {
      #[allow(unused_imports)]
      use ::fieldmap::__private::{MapKindOf as _, ScalarKindOf as _};
      (&&::fieldmap::__private::KindOf::<Tags>::new()).value_kind()
    }
  };
  assert_eq!(kind_tokens(&ty).to_string(), expected.to_string());
}
