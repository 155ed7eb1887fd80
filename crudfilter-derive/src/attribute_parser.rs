use syn::ext::IdentExt;
use syn::parse::Parser;
use syn::{Lit, Meta, punctuated::Punctuated, token::Comma};

/// Options read from `#[filterable(...)]` on a single field.
#[derive(Debug, Default)]
pub(crate) struct FieldOptions {
    /// Member name exposed to filters, if different from the field name.
    pub rename: Option<String>,
    /// The field is not a member at all.
    pub skip: bool,
}

/// Collects the `#[filterable(...)]` options of a field.
///
/// Supports:
/// - `#[filterable(rename = "fullName")]`
/// - `#[filterable(skip)]`
///
/// Unknown keys are reported at their span rather than ignored.
pub(crate) fn field_options(field: &syn::Field) -> syn::Result<FieldOptions> {
    let mut options = FieldOptions::default();

    for attr in &field.attrs {
        if !attr.path().is_ident("filterable") {
            continue;
        }
        let Meta::List(meta_list) = &attr.meta else {
            return Err(syn::Error::new_spanned(
                attr,
                "expected #[filterable(rename = \"...\")] or #[filterable(skip)]",
            ));
        };
        let metas =
            Punctuated::<Meta, Comma>::parse_terminated.parse2(meta_list.tokens.clone())?;
        for meta in metas {
            match meta {
                Meta::Path(path) if path.is_ident("skip") => options.skip = true,
                Meta::NameValue(nv) if nv.path.is_ident("rename") => {
                    if let syn::Expr::Lit(expr_lit) = &nv.value
                        && let Lit::Str(s) = &expr_lit.lit
                    {
                        let name = s.value();
                        if name.trim().is_empty() {
                            return Err(syn::Error::new_spanned(s, "rename must not be empty"));
                        }
                        options.rename = Some(name);
                    } else {
                        return Err(syn::Error::new_spanned(
                            &nv.value,
                            "rename expects a string literal",
                        ));
                    }
                }
                other => {
                    return Err(syn::Error::new_spanned(
                        other,
                        "unknown filterable attribute, expected `rename` or `skip`",
                    ));
                }
            }
        }
    }

    Ok(options)
}

/// Strips the raw identifier prefix, so `r#type` is exposed as `type`.
pub(crate) fn member_name(ident: &syn::Ident) -> String {
    ident.unraw().to_string()
}
