//! Applause POM Derive Macros: declarative page-object components
//!
//! `#[derive(PageObject)]` turns a struct of element fields into a
//! component. Every field carries one or more `#[locate(...)]` attributes,
//! one per platform, and is built lazily when the component is built.
//!
//! # Example
//!
//! ```ignore
//! use applause_pom::prelude::*;
//!
//! #[derive(Debug, PageObject)]
//! #[page_object(after_init = "check_loaded")]
//! struct SearchPage {
//!     #[base]
//!     base: BaseComponent,
//!
//!     #[locate(id = "q")]
//!     #[locate(accessibility_id = "search-field", on = "Android")]
//!     query: TextBox,
//!
//!     #[locate(css = "ul.results > li")]
//!     results: LazyList<ContainerElement>,
//!
//!     #[locate(css = "my-widget", shadow_root)]
//!     widget: ContainerElement,
//!
//!     // Not located; filled with `Default::default()`
//!     visits: u32,
//! }
//!
//! impl SearchPage {
//!     fn check_loaded(&mut self) -> PomResult<()> {
//!         self.query.initialize()
//!     }
//! }
//! ```
//!
//! # Attributes
//!
//! - `#[base]` marks the single `BaseComponent` field
//! - `#[locate(<strategy> = "...", on = "<Platform>", shadow_root)]` where
//!   `<strategy>` is one of `id`, `css`, `xpath`, `class`, `name`, `tag`,
//!   `link`, `partial_link`, `accessibility_id`, `android_uiautomator`,
//!   `ios_class_chain`, `ios_predicate`, `appium_class`, `jquery`, `js`
//! - `#[page_object(after_init = "method")]` runs `method(&mut self)` once
//!   the component is built
//!
//! # Platform implementations
//!
//! Deriving on an enum picks one implementation per platform. Every variant
//! wraps a single page object and names the platform it is written for;
//! the nearest platform in the context's fallback chain wins, and
//! `#[implementation]` without `on` stands for `Default`.
//!
//! ```ignore
//! #[derive(Debug, PageObject)]
//! enum Checkout {
//!     #[implementation]
//!     Web(WebCheckout),
//!     #[implementation(on = "Android")]
//!     Android(AndroidCheckout),
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{format_ident, quote};
use syn::{
    parse_macro_input, spanned::Spanned, Attribute, Data, DataEnum, DeriveInput, Error, Field,
    Fields, Ident, LitStr, Type,
};

/// Strategy keys accepted by `#[locate]` and the variant each selects
const STRATEGIES: &[(&str, &str)] = &[
    ("id", "Id"),
    ("css", "Css"),
    ("xpath", "XPath"),
    ("class", "ClassName"),
    ("name", "Name"),
    ("tag", "TagName"),
    ("link", "LinkText"),
    ("partial_link", "PartialLinkText"),
    ("accessibility_id", "AccessibilityId"),
    ("android_uiautomator", "AndroidUiAutomator"),
    ("ios_class_chain", "IosClassChain"),
    ("ios_predicate", "IosNsPredicate"),
    ("appium_class", "AppiumClassName"),
    ("jquery", "JQuery"),
    ("js", "JavaScript"),
];

/// Derive macro for page-object components.
///
/// Generates `applause_pom::PageObject` (building every located field as a
/// child of the component's underlying element) and `applause_pom::UiElement`
/// (delegating to the `#[base]` field).
#[proc_macro_derive(PageObject, attributes(base, locate, page_object, implementation))]
pub fn derive_page_object(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}

// ============================================================================
// Parsed input
// ============================================================================

struct LocateAttr {
    strategy: Ident,
    template: LitStr,
    platform: Option<LitStr>,
    shadow_root: bool,
}

enum FieldKind {
    Base,
    Located(Vec<LocateAttr>),
    Plain,
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let fields = match &input.data {
        Data::Enum(data) => return expand_implementations(input, data),
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "PageObject can only be derived for structs with named fields",
                ))
            }
        },
        Data::Union(_) => {
            return Err(Error::new(
                input.span(),
                "PageObject can only be derived for structs and enums",
            ))
        }
    };

    let after_init = parse_after_init(&input.attrs)?;

    let mut base_field = None;
    let mut initializers = Vec::new();
    for field in fields {
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected a named field"))?;
        match field_kind(field)? {
            FieldKind::Base => {
                if base_field.is_some() {
                    return Err(Error::new(field.span(), "only one field may be marked #[base]"));
                }
                base_field = Some(ident.clone());
                initializers.push(quote! {
                    #ident: ::applause_pom::BaseComponent::new(
                        ::core::stringify!(#name),
                        ::std::rc::Rc::clone(context),
                        underlying.clone(),
                    )
                });
            }
            FieldKind::Located(locates) => {
                let field_name = format!("{name}#{ident}");
                let candidates = locates.iter().map(|l| locator_tokens(l, &field_name));
                let select = quote! {
                    ::applause_pom::select_locator(
                        &[#(#candidates),*],
                        context.platform(),
                        #field_name,
                    )?
                };
                let init = if is_lazy_list(&field.ty) {
                    quote! { #ident: builder.initialize_list(#select) }
                } else {
                    quote! { #ident: builder.initialize(#select)? }
                };
                initializers.push(init);
            }
            FieldKind::Plain => {
                initializers.push(quote! { #ident: ::core::default::Default::default() });
            }
        }
    }

    let base = base_field.ok_or_else(|| {
        Error::new(
            Span::call_site(),
            "PageObject requires one `BaseComponent` field marked #[base]",
        )
    })?;

    let after_init_fn = after_init.map(|method| {
        quote! {
            fn after_init(&mut self) -> ::applause_pom::PomResult<()> {
                self.#method()
            }
        }
    });

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::applause_pom::PageObject for #name #ty_generics #where_clause {
            fn build(
                context: &::applause_pom::PageContext,
                underlying: ::core::option::Option<::applause_pom::LazyWebElement>,
            ) -> ::applause_pom::PomResult<Self> {
                let inherited = underlying
                    .as_ref()
                    .map(::applause_pom::LazyWebElement::format_args)
                    .unwrap_or_default();
                #[allow(unused_variables)]
                let builder = ::applause_pom::PageObjectBuilder::with_context(
                    ::std::rc::Rc::clone(context),
                )
                .with_optional_parent(underlying.clone())
                .with_format(inherited);
                ::core::result::Result::Ok(Self {
                    #(#initializers,)*
                })
            }

            #after_init_fn

            fn attach_hooks(&mut self, hooks: ::std::rc::Rc<dyn ::applause_pom::ComponentHooks>) {
                self.#base.set_hooks(hooks);
            }
        }

        impl #impl_generics ::applause_pom::UiElement for #name #ty_generics #where_clause {
            fn element_name(&self) -> &str {
                ::applause_pom::UiElement::element_name(&self.#base)
            }

            fn context(&self) -> &::applause_pom::PageContext {
                ::applause_pom::UiElement::context(&self.#base)
            }

            fn lazy_for(
                &self,
                operation: &str,
            ) -> ::applause_pom::PomResult<&::applause_pom::LazyWebElement> {
                ::applause_pom::UiElement::lazy_for(&self.#base, operation)
            }
        }
    })
}

// ============================================================================
// Platform implementations
// ============================================================================

fn expand_implementations(input: &DeriveInput, data: &DataEnum) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    if parse_after_init(&input.attrs)?.is_some() {
        return Err(Error::new(
            input.span(),
            "after_init belongs on the implementations, not on the enum",
        ));
    }

    let mut platforms: Vec<LitStr> = Vec::new();
    let mut variants = Vec::new();
    for variant in &data.variants {
        let ty = match &variant.fields {
            Fields::Unnamed(fields) if fields.unnamed.len() == 1 => &fields.unnamed[0].ty,
            _ => {
                return Err(Error::new(
                    variant.span(),
                    "implementation variants wrap exactly one page object, e.g. `Android(AndroidLogin)`",
                ))
            }
        };
        let platform = parse_implementation(variant)?;
        if platforms.iter().any(|p| p.value() == platform.value()) {
            return Err(Error::new(
                platform.span(),
                format!("two implementations declared on `{}`", platform.value()),
            ));
        }
        platforms.push(platform);
        variants.push((&variant.ident, ty));
    }

    let Some(((last_ident, last_ty), rest)) = variants.split_last() else {
        return Err(Error::new(
            input.span(),
            "PageObject enums need at least one #[implementation] variant",
        ));
    };
    let build_variant = |ident: &Ident, ty: &Type| {
        quote! {
            ::core::result::Result::Ok(Self::#ident(
                <#ty as ::applause_pom::PageObject>::build(context, underlying)?,
            ))
        }
    };
    let dispatch = rest.iter().enumerate().rev().fold(
        build_variant(last_ident, last_ty),
        |otherwise, (index, (ident, ty))| {
            let build = build_variant(ident, ty);
            quote! {
                if implementation == #index { #build } else { #otherwise }
            }
        },
    );
    let idents: Vec<&Ident> = variants.iter().map(|(ident, _)| *ident).collect();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::applause_pom::PageObject for #name #ty_generics #where_clause {
            fn build(
                context: &::applause_pom::PageContext,
                underlying: ::core::option::Option<::applause_pom::LazyWebElement>,
            ) -> ::applause_pom::PomResult<Self> {
                #[allow(unused_variables)]
                let implementation = ::applause_pom::select_implementation(
                    &[#(::applause_pom::Platform::from_name(#platforms)),*],
                    context.platform(),
                    ::core::stringify!(#name),
                )?;
                #dispatch
            }

            fn after_init(&mut self) -> ::applause_pom::PomResult<()> {
                match self {
                    #(Self::#idents(inner) => ::applause_pom::PageObject::after_init(inner),)*
                }
            }

            fn attach_hooks(&mut self, hooks: ::std::rc::Rc<dyn ::applause_pom::ComponentHooks>) {
                match self {
                    #(Self::#idents(inner) => {
                        ::applause_pom::PageObject::attach_hooks(inner, hooks);
                    })*
                }
            }
        }

        impl #impl_generics ::applause_pom::UiElement for #name #ty_generics #where_clause {
            fn element_name(&self) -> &str {
                match self {
                    #(Self::#idents(inner) => ::applause_pom::UiElement::element_name(inner),)*
                }
            }

            fn context(&self) -> &::applause_pom::PageContext {
                match self {
                    #(Self::#idents(inner) => ::applause_pom::UiElement::context(inner),)*
                }
            }

            fn lazy_for(
                &self,
                operation: &str,
            ) -> ::applause_pom::PomResult<&::applause_pom::LazyWebElement> {
                match self {
                    #(Self::#idents(inner) => {
                        ::applause_pom::UiElement::lazy_for(inner, operation)
                    })*
                }
            }
        }
    })
}

/// Platform named by a variant's `#[implementation(on = "...")]`
fn parse_implementation(variant: &syn::Variant) -> syn::Result<LitStr> {
    let mut attrs = variant
        .attrs
        .iter()
        .filter(|a| a.path().is_ident("implementation"));
    let attr = attrs.next().ok_or_else(|| {
        Error::new(
            variant.span(),
            "each variant needs #[implementation] or #[implementation(on = \"<Platform>\")]",
        )
    })?;
    if let Some(extra) = attrs.next() {
        return Err(Error::new(extra.span(), "only one #[implementation] per variant"));
    }
    let mut platform = None;
    if matches!(attr.meta, syn::Meta::List(_)) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("on") {
                platform = Some(meta.value()?.parse::<LitStr>()?);
                Ok(())
            } else {
                Err(meta.error("unsupported implementation attribute"))
            }
        })?;
    }
    Ok(platform.unwrap_or_else(|| LitStr::new("Default", attr.span())))
}

// ============================================================================
// Helper Functions
// ============================================================================

fn field_kind(field: &Field) -> syn::Result<FieldKind> {
    let is_base = field.attrs.iter().any(|a| a.path().is_ident("base"));
    let locates = field
        .attrs
        .iter()
        .filter(|a| a.path().is_ident("locate"))
        .map(parse_locate)
        .collect::<syn::Result<Vec<_>>>()?;
    match (is_base, locates.is_empty()) {
        (true, true) => Ok(FieldKind::Base),
        (true, false) => Err(Error::new(
            field.span(),
            "a #[base] field cannot also be #[locate]d",
        )),
        (false, false) => Ok(FieldKind::Located(locates)),
        (false, true) => Ok(FieldKind::Plain),
    }
}

fn parse_locate(attr: &Attribute) -> syn::Result<LocateAttr> {
    let mut strategy = None;
    let mut platform = None;
    let mut shadow_root = false;
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("on") {
            platform = Some(meta.value()?.parse::<LitStr>()?);
            return Ok(());
        }
        if meta.path.is_ident("shadow_root") {
            shadow_root = true;
            return Ok(());
        }
        let key = meta
            .path
            .get_ident()
            .map(ToString::to_string)
            .unwrap_or_default();
        let variant = STRATEGIES
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
            .ok_or_else(|| meta.error(format!("unknown locator strategy `{key}`")))?;
        if strategy.is_some() {
            return Err(meta.error("only one strategy per #[locate]"));
        }
        let template = meta.value()?.parse::<LitStr>()?;
        strategy = Some((format_ident!("{}", variant), template));
        Ok(())
    })?;
    let (strategy, template) = strategy.ok_or_else(|| {
        Error::new(attr.span(), "#[locate] needs a strategy, e.g. id = \"...\"")
    })?;
    Ok(LocateAttr {
        strategy,
        template,
        platform,
        shadow_root,
    })
}

fn locator_tokens(locate: &LocateAttr, field_name: &str) -> TokenStream2 {
    let LocateAttr {
        strategy,
        template,
        platform,
        shadow_root,
    } = locate;
    let on = platform.as_ref().map(|p| {
        quote! { .on(::applause_pom::Platform::from_name(#p)) }
    });
    quote! {
        ::applause_pom::Locator::new(::applause_pom::Strategy::#strategy, #template)
            #on
            .named(#field_name)
            .with_shadow_root(#shadow_root)
    }
}

fn parse_after_init(attrs: &[Attribute]) -> syn::Result<Option<Ident>> {
    let mut method = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("page_object")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("after_init") {
                let lit = meta.value()?.parse::<LitStr>()?;
                method = Some(Ident::new(&lit.value(), lit.span()));
                Ok(())
            } else {
                Err(meta.error("unsupported page_object attribute"))
            }
        })?;
    }
    Ok(method)
}

fn is_lazy_list(ty: &Type) -> bool {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "LazyList"),
        _ => false,
    }
}
