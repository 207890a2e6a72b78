//! Derive macro for `fieldgroup_core::Record`.
//!
//! ```ignore
//! #[derive(Debug, Clone, Default, PartialEq, Record)]
//! #[record(name = "KafkaConfig")]
//! pub struct KafkaConfig {
//!     #[field(default = "logs")]
//!     pub topic: String,
//!     pub bootstrap_servers: Vec<String>,
//!     #[field(key = "max_block_seconds", omit_empty, duration)]
//!     pub max_block: String,
//! }
//! ```
//!
//! Schema mistakes (duplicate keys, a default literal that does not fit the
//! field type, a rule on a non-string field, a `found_in` naming a missing
//! sibling) are reported as compile errors on the offending tokens.

use proc_macro::TokenStream;
use quote::quote;
use std::collections::BTreeSet;
use syn::{
    Attribute, Data, DeriveInput, Expr, ExprLit, ExprUnary, Fields, Ident, Lit, LitStr, Type, UnOp,
};

/// Derive `fieldgroup_core::Record`, `RecordView`, and `FieldType` for a named struct.
#[proc_macro_derive(Record, attributes(record, field))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    match expand_record(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

struct FieldSpec<'a> {
    ident: &'a Ident,
    ty: &'a Type,
    key: LitStr,
    default: Option<DefaultLit>,
    omit_empty: bool,
    rules: Vec<RuleSpec>,
}

enum DefaultLit {
    Str(LitStr),
    Int(proc_macro2::TokenStream),
    Float(proc_macro2::TokenStream),
    Bool(bool),
}

enum RuleSpec {
    Duration,
    FoundIn(LitStr),
    Reachable,
}

fn expand_record(input: &DeriveInput) -> Result<proc_macro2::TokenStream, syn::Error> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Record cannot be derived for generic types",
        ));
    }
    let Data::Struct(struct_data) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "Record can only be derived for structs",
        ));
    };
    let Fields::Named(named) = &struct_data.fields else {
        return Err(syn::Error::new_spanned(
            &struct_data.fields,
            "Record requires named fields",
        ));
    };

    let record_name = parse_record_name(&input.attrs)?
        .unwrap_or_else(|| LitStr::new(&input.ident.to_string(), input.ident.span()));

    let mut specs = Vec::with_capacity(named.named.len());
    let mut seen = BTreeSet::new();
    for field in &named.named {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let spec = parse_field(&field.attrs, ident, &field.ty)?;
        if !seen.insert(spec.key.value()) {
            return Err(syn::Error::new_spanned(
                &spec.key,
                format!("duplicate field key `{}`", spec.key.value()),
            ));
        }
        specs.push(spec);
    }
    check_siblings(&specs)?;

    let name = &input.ident;
    let schema_entries = specs.iter().map(expand_schema_entry);
    let view_arms = specs.iter().map(|spec| {
        let FieldSpec { ident, key, .. } = spec;
        quote! { #key => ::core::option::Option::Some(::fieldgroup_core::FieldType::view(&self.#ident)), }
    });
    let slot_arms = specs.iter().map(|spec| {
        let FieldSpec { ident, key, .. } = spec;
        quote! {
            #key => {
                let slot: &mut dyn ::fieldgroup_core::Slot = &mut self.#ident;
                ::core::option::Option::Some(slot)
            },
        }
    });

    Ok(quote! {
        impl ::fieldgroup_core::RecordView for #name {
            fn schema(&self) -> &'static ::fieldgroup_core::RecordSchema {
                <Self as ::fieldgroup_core::Record>::record_schema()
            }

            fn field(&self, key: &str) -> ::core::option::Option<::fieldgroup_core::FieldRef<'_>> {
                match key {
                    #(#view_arms)*
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl ::fieldgroup_core::Record for #name {
            fn record_schema() -> &'static ::fieldgroup_core::RecordSchema {
                static SCHEMA: ::fieldgroup_core::RecordSchema = ::fieldgroup_core::RecordSchema {
                    name: #record_name,
                    fields: &[#(#schema_entries),*],
                };
                &SCHEMA
            }

            fn slot_mut(&mut self, key: &str) -> ::core::option::Option<&mut dyn ::fieldgroup_core::Slot> {
                match key {
                    #(#slot_arms)*
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl ::fieldgroup_core::FieldType for #name {
            const KIND: ::fieldgroup_core::FieldKind =
                ::fieldgroup_core::FieldKind::Record(<#name as ::fieldgroup_core::Record>::record_schema);

            fn coerce(
                value: &::fieldgroup_core::Value,
                path: &::fieldgroup_core::FieldPath,
                errors: &mut ::std::vec::Vec<::fieldgroup_core::FieldError>,
            ) -> ::core::option::Option<Self> {
                ::fieldgroup_core::coerce_record::<Self>(value, path, errors)
            }

            fn view(&self) -> ::fieldgroup_core::FieldRef<'_> {
                ::fieldgroup_core::FieldRef::Record(::core::option::Option::Some(self))
            }
        }
    })
}

fn parse_record_name(attrs: &[Attribute]) -> Result<Option<LitStr>, syn::Error> {
    let mut name = None;
    for attr in attrs {
        if !attr.path().is_ident("record") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                if name.is_some() {
                    return Err(meta.error("duplicate record(name = ...)"));
                }
                name = Some(meta.value()?.parse::<LitStr>()?);
                return Ok(());
            }
            Err(meta.error("unsupported record attribute"))
        })?;
    }
    Ok(name)
}

fn parse_field<'a>(
    attrs: &[Attribute],
    ident: &'a Ident,
    ty: &'a Type,
) -> Result<FieldSpec<'a>, syn::Error> {
    let mut key: Option<LitStr> = None;
    let mut default = None;
    let mut omit_empty = false;
    let mut rules = Vec::new();

    for attr in attrs {
        if !attr.path().is_ident("field") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("key") {
                if key.is_some() {
                    return Err(meta.error("duplicate field(key = ...)"));
                }
                key = Some(meta.value()?.parse()?);
                return Ok(());
            }
            if meta.path.is_ident("default") {
                if default.is_some() {
                    return Err(meta.error("duplicate field(default = ...)"));
                }
                let expr: Expr = meta.value()?.parse()?;
                default = Some(parse_default(&expr, ty)?);
                return Ok(());
            }
            if meta.path.is_ident("omit_empty") {
                omit_empty = true;
                return Ok(());
            }
            if meta.path.is_ident("duration") {
                require_string(ty, "duration")?;
                rules.push(RuleSpec::Duration);
                return Ok(());
            }
            if meta.path.is_ident("reachable") {
                require_string(ty, "reachable")?;
                rules.push(RuleSpec::Reachable);
                return Ok(());
            }
            if meta.path.is_ident("found_in") {
                require_string(ty, "found_in")?;
                rules.push(RuleSpec::FoundIn(meta.value()?.parse()?));
                return Ok(());
            }
            Err(meta.error("unsupported field attribute"))
        })?;
    }

    let key = key.unwrap_or_else(|| LitStr::new(&ident.to_string(), ident.span()));
    Ok(FieldSpec {
        ident,
        ty,
        key,
        default,
        omit_empty,
        rules,
    })
}

fn check_siblings(specs: &[FieldSpec<'_>]) -> Result<(), syn::Error> {
    for spec in specs {
        for rule in &spec.rules {
            let RuleSpec::FoundIn(sibling) = rule else {
                continue;
            };
            let target = specs
                .iter()
                .find(|candidate| candidate.key.value() == sibling.value())
                .ok_or_else(|| {
                    syn::Error::new_spanned(
                        sibling,
                        format!("found_in names unknown sibling `{}`", sibling.value()),
                    )
                })?;
            if last_segment(target.ty).is_none_or(|segment| segment != "OpenMap") {
                return Err(syn::Error::new_spanned(
                    sibling,
                    "found_in must name an OpenMap sibling field",
                ));
            }
        }
    }
    Ok(())
}

fn require_string(ty: &Type, rule: &str) -> Result<(), syn::Error> {
    if is_string_like(ty) {
        Ok(())
    } else {
        Err(syn::Error::new_spanned(
            ty,
            format!("{rule} can only be used on String fields"),
        ))
    }
}

fn parse_default(expr: &Expr, ty: &Type) -> Result<DefaultLit, syn::Error> {
    let (negative, lit) = match expr {
        Expr::Lit(ExprLit { lit, .. }) => (false, lit),
        Expr::Unary(ExprUnary {
            op: UnOp::Neg(_),
            expr: inner,
            ..
        }) => match inner.as_ref() {
            Expr::Lit(ExprLit { lit, .. }) => (true, lit),
            _ => return Err(syn::Error::new_spanned(expr, "default must be a literal")),
        },
        _ => return Err(syn::Error::new_spanned(expr, "default must be a literal")),
    };
    let sign = if negative { quote!(-) } else { quote!() };

    let mismatch = || {
        syn::Error::new_spanned(
            expr,
            format!("default literal does not match field type `{}`", type_label(ty)),
        )
    };

    match lit {
        Lit::Str(value) if !negative && is_string_like(ty) => Ok(DefaultLit::Str(value.clone())),
        Lit::Bool(value) if !negative && is_bool(ty) => Ok(DefaultLit::Bool(value.value)),
        Lit::Int(value) => match numeric_kind(ty) {
            Some(NumberKind::Integer) => {
                let digits: i64 = value.base10_parse()?;
                Ok(DefaultLit::Int(quote!(#sign #digits)))
            },
            Some(NumberKind::Float) => {
                let digits = syn::LitFloat::new(
                    &format!("{}.0", value.base10_digits()),
                    value.span(),
                );
                Ok(DefaultLit::Float(quote!(#sign #digits)))
            },
            None => Err(mismatch()),
        },
        Lit::Float(value) if matches!(numeric_kind(ty), Some(NumberKind::Float)) => {
            let digits = syn::LitFloat::new(value.base10_digits(), value.span());
            Ok(DefaultLit::Float(quote!(#sign #digits)))
        },
        _ => Err(mismatch()),
    }
}

fn expand_schema_entry(spec: &FieldSpec<'_>) -> proc_macro2::TokenStream {
    let FieldSpec {
        ty,
        key,
        default,
        omit_empty,
        rules,
        ..
    } = spec;
    let default = match default {
        None => quote!(::fieldgroup_core::DefaultValue::Zero),
        Some(DefaultLit::Str(value)) => quote!(::fieldgroup_core::DefaultValue::Str(#value)),
        Some(DefaultLit::Int(value)) => quote!(::fieldgroup_core::DefaultValue::Int(#value)),
        Some(DefaultLit::Float(value)) => quote!(::fieldgroup_core::DefaultValue::Float(#value)),
        Some(DefaultLit::Bool(value)) => quote!(::fieldgroup_core::DefaultValue::Bool(#value)),
    };
    let rules = rules.iter().map(|rule| match rule {
        RuleSpec::Duration => quote!(::fieldgroup_core::Rule::Duration),
        RuleSpec::Reachable => quote!(::fieldgroup_core::Rule::Reachable),
        RuleSpec::FoundIn(field) => quote!(::fieldgroup_core::Rule::FoundIn { field: #field }),
    });
    quote! {
        ::fieldgroup_core::FieldSchema {
            key: #key,
            kind: <#ty as ::fieldgroup_core::FieldType>::KIND,
            default: #default,
            rules: &[#(#rules),*],
            omit_empty: #omit_empty,
        }
    }
}

fn last_segment(ty: &Type) -> Option<Ident> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    type_path
        .path
        .segments
        .last()
        .map(|segment| segment.ident.clone())
}

fn type_label(ty: &Type) -> String {
    last_segment(ty).map_or_else(|| "?".to_owned(), |ident| ident.to_string())
}

fn is_bool(ty: &Type) -> bool {
    last_segment(ty).is_some_and(|ident| ident == "bool")
}

fn is_string_like(ty: &Type) -> bool {
    last_segment(ty).is_some_and(|ident| ident == "String")
}

#[derive(Copy, Clone, Debug)]
enum NumberKind {
    Integer,
    Float,
}

fn numeric_kind(ty: &Type) -> Option<NumberKind> {
    let ident = last_segment(ty)?;
    let ident = ident.to_string();
    if matches!(ident.as_str(), "f32" | "f64") {
        return Some(NumberKind::Float);
    }
    if matches!(
        ident.as_str(),
        "u8" | "u16" | "u32" | "u64" | "usize" | "i8" | "i16" | "i32" | "i64" | "isize"
    ) {
        return Some(NumberKind::Integer);
    }
    None
}

