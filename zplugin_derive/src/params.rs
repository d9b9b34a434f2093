use std::collections::HashSet;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::spanned::Spanned;

/// A local copy of the runtime's FNV-1a/32 (`crate::util::fnv1a32`), computed at macro-expansion
/// time so the generated lookup table can be emitted as a literal, already-sorted array.
const fn fnv1a32(bytes: &[u8]) -> u32 {
    const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
    const FNV_PRIME: u32 = 0x0100_0193;

    let mut hash = FNV_OFFSET_BASIS;
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u32;
        hash = hash.wrapping_mul(FNV_PRIME);
        i += 1;
    }
    hash
}

struct FieldSpec {
    kind: String,
    id: String,
    name: String,
    default: syn::Lit,
    min: Option<syn::Lit>,
    max: Option<syn::Lit>,
    unit: Option<String>,
    log: bool,
    smoothing: Option<String>,
    smoothing_ms: Option<syn::Lit>,
    labels: Option<Vec<String>>,
    flags: Option<Vec<String>>,
    span: proc_macro2::Span,
}

fn lit_str(lit: &syn::Lit, span: proc_macro2::Span, what: &str) -> syn::Result<String> {
    match lit {
        syn::Lit::Str(s) => Ok(s.value()),
        _ => Err(syn::Error::new(span, format!("`{what}` must be a string literal"))),
    }
}

fn parse_field_spec(field: &syn::Field) -> syn::Result<Option<FieldSpec>> {
    let attr = match field.attrs.iter().find(|attr| attr.path.is_ident("param")) {
        Some(attr) => attr,
        None => return Ok(None),
    };

    let meta = attr.parse_meta()?;
    let list = match meta {
        syn::Meta::List(list) => list,
        _ => {
            return Err(syn::Error::new(
                attr.span(),
                "expected `#[param(key = value, ...)]`",
            ))
        }
    };

    let mut kind: Option<String> = None;
    let mut id: Option<String> = None;
    let mut name: Option<String> = None;
    let mut default: Option<syn::Lit> = None;
    let mut min: Option<syn::Lit> = None;
    let mut max: Option<syn::Lit> = None;
    let mut unit: Option<String> = None;
    let mut log = false;
    let mut smoothing: Option<String> = None;
    let mut smoothing_ms: Option<syn::Lit> = None;
    let mut labels: Option<Vec<String>> = None;
    let mut flags: Option<Vec<String>> = None;

    for nested in list.nested.iter() {
        match nested {
            syn::NestedMeta::Meta(syn::Meta::NameValue(mnv)) => {
                let key = mnv
                    .path
                    .get_ident()
                    .map(|ident| ident.to_string())
                    .unwrap_or_default();
                match key.as_str() {
                    "kind" => kind = Some(lit_str(&mnv.lit, mnv.span(), "kind")?),
                    "id" => id = Some(lit_str(&mnv.lit, mnv.span(), "id")?),
                    "name" => name = Some(lit_str(&mnv.lit, mnv.span(), "name")?),
                    "default" => default = Some(mnv.lit.clone()),
                    "min" => min = Some(mnv.lit.clone()),
                    "max" => max = Some(mnv.lit.clone()),
                    "unit" => unit = Some(lit_str(&mnv.lit, mnv.span(), "unit")?),
                    "smoothing" => smoothing = Some(lit_str(&mnv.lit, mnv.span(), "smoothing")?),
                    "smoothing_ms" => smoothing_ms = Some(mnv.lit.clone()),
                    "labels" => {
                        let raw = lit_str(&mnv.lit, mnv.span(), "labels")?;
                        labels = Some(raw.split('|').map(|s| s.trim().to_owned()).collect());
                    }
                    "flags" => {
                        let raw = lit_str(&mnv.lit, mnv.span(), "flags")?;
                        flags = Some(raw.split('|').map(|s| s.trim().to_owned()).collect());
                    }
                    other => {
                        return Err(syn::Error::new(
                            mnv.span(),
                            format!("unknown `#[param(...)]` key `{other}`"),
                        ))
                    }
                }
            }
            syn::NestedMeta::Meta(syn::Meta::Path(path)) if path.is_ident("log") => {
                log = true;
            }
            other => {
                return Err(syn::Error::new(
                    other.span(),
                    "expected `key = value` or the bare `log` flag",
                ))
            }
        }
    }

    let kind = kind.ok_or_else(|| syn::Error::new(attr.span(), "missing `kind`"))?;
    let id = id.ok_or_else(|| syn::Error::new(attr.span(), "missing `id`"))?;
    let name = name.ok_or_else(|| syn::Error::new(attr.span(), "missing `name`"))?;
    let default = default.ok_or_else(|| syn::Error::new(attr.span(), "missing `default`"))?;

    Ok(Some(FieldSpec {
        kind,
        id,
        name,
        default,
        min,
        max,
        unit,
        log,
        smoothing,
        smoothing_ms,
        labels,
        flags,
        span: attr.span(),
    }))
}

fn flags_tokens(flags: &Option<Vec<String>>, span: proc_macro2::Span) -> syn::Result<TokenStream2> {
    match flags {
        None => Ok(quote! { ::zplugin::params::ParamFlags::default() }),
        Some(names) => {
            let mut tokens = quote! { ::zplugin::params::ParamFlags::empty() };
            for name in names {
                let variant = match name.as_str() {
                    "automatable" => quote! { ::zplugin::params::ParamFlags::AUTOMATABLE },
                    "modulatable" => quote! { ::zplugin::params::ParamFlags::MODULATABLE },
                    "hidden" => quote! { ::zplugin::params::ParamFlags::HIDDEN },
                    "bypass" => quote! { ::zplugin::params::ParamFlags::BYPASS },
                    "stepped" => quote! { ::zplugin::params::ParamFlags::STEPPED },
                    other => {
                        return Err(syn::Error::new(
                            span,
                            format!("unknown flag `{other}`"),
                        ))
                    }
                };
                tokens = quote! { #tokens | #variant };
            }
            Ok(tokens)
        }
    }
}

fn decl_tokens(spec: &FieldSpec) -> syn::Result<TokenStream2> {
    let name = &spec.name;
    let id = &spec.id;
    let flags = flags_tokens(&spec.flags, spec.span)?;

    match spec.kind.as_str() {
        "continuous" => {
            let default = &spec.default;
            let min = spec
                .min
                .as_ref()
                .ok_or_else(|| syn::Error::new(spec.span, "continuous parameters need `min`"))?;
            let max = spec
                .max
                .as_ref()
                .ok_or_else(|| syn::Error::new(spec.span, "continuous parameters need `max`"))?;
            let range = if spec.log {
                quote! { ::zplugin::params::FloatRange::Logarithmic { min: #min, max: #max } }
            } else {
                quote! { ::zplugin::params::FloatRange::Linear { min: #min, max: #max } }
            };
            let unit = match &spec.unit {
                Some(unit) => quote! { Some(#unit) },
                None => quote! { None },
            };
            let smoothing = match spec.smoothing.as_deref() {
                None | Some("none") => quote! { ::zplugin::params::SmoothingStyle::None },
                Some(style) => {
                    let ms = spec.smoothing_ms.as_ref().ok_or_else(|| {
                        syn::Error::new(spec.span, "`smoothing` needs a `smoothing_ms` duration")
                    })?;
                    match style {
                        "linear" => quote! { ::zplugin::params::SmoothingStyle::Linear(#ms) },
                        "logarithmic" => quote! { ::zplugin::params::SmoothingStyle::Logarithmic(#ms) },
                        "exponential" => quote! { ::zplugin::params::SmoothingStyle::Exponential(#ms) },
                        other => {
                            return Err(syn::Error::new(
                                spec.span,
                                format!("unknown smoothing style `{other}`"),
                            ))
                        }
                    }
                }
            };
            Ok(quote! {
                ::zplugin::params::ParamDecl::Continuous {
                    name: #name,
                    id: #id,
                    default: #default,
                    range: #range,
                    unit: #unit,
                    smoothing: #smoothing,
                    flags: #flags,
                }
            })
        }
        "integer" => {
            let default = &spec.default;
            let min = spec
                .min
                .as_ref()
                .ok_or_else(|| syn::Error::new(spec.span, "integer parameters need `min`"))?;
            let max = spec
                .max
                .as_ref()
                .ok_or_else(|| syn::Error::new(spec.span, "integer parameters need `max`"))?;
            Ok(quote! {
                ::zplugin::params::ParamDecl::Integer {
                    name: #name,
                    id: #id,
                    default: #default,
                    range: ::zplugin::params::IntRange::Linear { min: #min, max: #max },
                    flags: #flags,
                }
            })
        }
        "boolean" => {
            let default = &spec.default;
            Ok(quote! {
                ::zplugin::params::ParamDecl::Boolean {
                    name: #name,
                    id: #id,
                    default: #default,
                    flags: #flags,
                }
            })
        }
        "choice" => {
            let default = &spec.default;
            let labels = spec
                .labels
                .as_ref()
                .ok_or_else(|| syn::Error::new(spec.span, "choice parameters need `labels`"))?;
            Ok(quote! {
                ::zplugin::params::ParamDecl::Choice {
                    name: #name,
                    id: #id,
                    default_index: #default,
                    labels: &[#(#labels),*],
                    flags: #flags,
                }
            })
        }
        other => Err(syn::Error::new(
            spec.span,
            format!("unknown parameter `kind` `{other}`, expected continuous/integer/boolean/choice"),
        )),
    }
}

pub fn derive_params(input: TokenStream) -> TokenStream {
    let ast = syn::parse_macro_input!(input as syn::DeriveInput);
    let struct_name = &ast.ident;

    let fields = match ast.data {
        syn::Data::Struct(syn::DataStruct {
            fields: syn::Fields::Named(named_fields),
            ..
        }) => named_fields,
        _ => {
            return syn::Error::new(
                ast.span(),
                "deriving Params is only supported on structs with named fields",
            )
            .to_compile_error()
            .into()
        }
    };

    let mut decls = Vec::new();
    let mut ids_seen = HashSet::new();
    let mut hashes_seen = HashSet::new();

    for field in fields.named.iter() {
        let spec = match parse_field_spec(field) {
            Ok(Some(spec)) => spec,
            Ok(None) => continue,
            Err(err) => return err.to_compile_error().into(),
        };

        if !ids_seen.insert(spec.id.clone()) {
            return syn::Error::new(spec.span, format!("duplicate parameter id `{}`", spec.id))
                .to_compile_error()
                .into();
        }

        let hash = fnv1a32(spec.id.as_bytes());
        if !hashes_seen.insert(hash) {
            return syn::Error::new(
                spec.span,
                format!(
                    "parameter id `{}` collides with another id's FNV-1a/32 hash; rename one of them",
                    spec.id
                ),
            )
            .to_compile_error()
            .into();
        }

        let tokens = match decl_tokens(&spec) {
            Ok(tokens) => tokens,
            Err(err) => return err.to_compile_error().into(),
        };
        decls.push((hash, tokens));
    }

    let declarations_len = decls.len();
    let decl_tokens: Vec<_> = decls.iter().map(|(_, tokens)| tokens.clone()).collect();

    let mut lookup: Vec<(u32, usize)> = decls
        .iter()
        .enumerate()
        .map(|(index, (hash, _))| (*hash, index))
        .collect();
    lookup.sort_unstable_by_key(|(hash, _)| *hash);
    let lookup_hashes: Vec<u32> = lookup.iter().map(|(hash, _)| *hash).collect();
    let lookup_indices: Vec<usize> = lookup.iter().map(|(_, index)| *index).collect();

    quote! {
        impl ::zplugin::params::Params for #struct_name {
            fn declarations() -> &'static [::zplugin::params::ParamDecl] {
                static DECLARATIONS: [::zplugin::params::ParamDecl; #declarations_len] = [
                    #(#decl_tokens),*
                ];
                &DECLARATIONS
            }

            fn lookup_table() -> &'static [(u32, usize)] {
                static LOOKUP: [(u32, usize); #declarations_len] = [
                    #((#lookup_hashes, #lookup_indices)),*
                ];
                &LOOKUP
            }
        }
    }
    .into()
}
