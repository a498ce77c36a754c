//! SIP declaration synthesis.
//!
//! Walks a [`HeaderAst`] and writes one block per namespace with free
//! functions and one per exported class. Any declaration whose line is in a
//! [`SkipRanges`] interval is left out.

pub mod enums;
pub mod format;
pub mod includes;

use tracing::{debug, info};

pub use enums::{ResolvedEnumerator, evaluate, resolve_enumerators};
pub use format::{TRANSFER_THIS, method_line, normalize_scopes, parameter, transfers_ownership};
pub use includes::{include_block, include_targets, needs_include};

use crate::{
    conditionals::SkipRanges,
    error::Result,
    header::{Access, ClassDescriptor, EnumDescriptor, HeaderAst, MethodCategory, MethodDescriptor, NamespaceDescriptor},
    macros::ExportMetadata,
};

/// Synthesized declarations of one header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Synthesis {
    /// Namespace and class blocks, scope spacing already normalized.
    pub body: String,
    /// Base classes that need a `%Include` of their own artifact.
    pub includes: Vec<String>,
    /// Exported classes that made it into `body`.
    pub classes: Vec<String>,
}

impl Synthesis {
    pub fn is_blank(&self) -> bool {
        self.body.trim().is_empty()
    }
}

pub struct Synthesizer<'a> {
    ast: &'a HeaderAst,
    skip: &'a SkipRanges,
    metadata: &'a ExportMetadata,
    /// File name used in `%TypeHeaderCode` includes, e.g. `ctkSlider.h`.
    header_name: &'a str,
}

impl<'a> Synthesizer<'a> {
    pub fn new(
        ast: &'a HeaderAst,
        skip: &'a SkipRanges,
        metadata: &'a ExportMetadata,
        header_name: &'a str,
    ) -> Self {
        Self {
            ast,
            skip,
            metadata,
            header_name,
        }
    }

    pub fn synthesize(&self) -> Result<Synthesis> {
        let mut out = String::new();
        for namespace in &self.ast.namespaces {
            self.write_namespace(&mut out, namespace);
        }

        let mut classes = Vec::new();
        let mut bases = Vec::new();
        for class in &self.ast.classes {
            if !self.metadata.is_exported(&class.name) {
                debug!("{}: {} is not exported", self.header_name, class.name);
                continue;
            }
            if self.skip.is_skipped(class.line) {
                debug!("SKIP: class {} at line {}", class.name, class.line);
                continue;
            }
            info!("Synthesizing class {}", class.name);
            self.write_class(&mut out, class)?;
            classes.push(class.name.clone());
            bases.extend(class.bases.iter().map(|base| base.name.as_str()));
        }

        Ok(Synthesis {
            body: normalize_scopes(&out),
            includes: include_targets(bases, &classes),
            classes,
        })
    }

    fn write_namespace(
        &self,
        out: &mut String,
        namespace: &NamespaceDescriptor,
    ) {
        if self.skip.is_skipped(namespace.line) {
            debug!("SKIP: namespace {} at line {}", namespace.name, namespace.line);
            return;
        }
        let functions = self.live_methods(namespace.functions.iter(), true);
        if functions.is_empty() {
            debug!("{}: namespace {} has no functions left", self.header_name, namespace.name);
            return;
        }
        info!("Synthesizing namespace {}", namespace.name);
        out.push_str(&format!("namespace {} {{\n\n", namespace.name));
        self.write_type_header_code(out);
        write_methods(out, &functions);
        out.push_str("};\n\n");
    }

    fn write_class(
        &self,
        out: &mut String,
        class: &ClassDescriptor,
    ) -> Result<()> {
        let mut declaration = format!("{} {}", class.keyword.as_str(), class.name);
        if !class.bases.is_empty() {
            let bases: Vec<String> = class
                .bases
                .iter()
                .map(|base| format!("{} {}", base.access.as_str(), base.name))
                .collect();
            declaration.push_str(" : ");
            declaration.push_str(&bases.join(", "));
        }
        out.push_str(&declaration);
        out.push_str(" {\n\n");
        self.write_type_header_code(out);

        out.push_str("public:\n");
        for descriptor in self.live_enums(class, Access::Public) {
            self.write_enum(out, class, descriptor)?;
        }
        write_methods(out, &self.live_methods(class.methods_in(MethodCategory::Public), true));

        let public_slots = self.live_methods(class.methods_in(MethodCategory::PublicSlot), true);
        if !public_slots.is_empty() {
            out.push_str("public slots:\n");
            write_methods(out, &public_slots);
        }

        let protected_enums = self.live_enums(class, Access::Protected);
        let protected = self.live_methods(class.methods_in(MethodCategory::Protected), false);
        if !protected_enums.is_empty() || !protected.is_empty() {
            out.push_str("protected:\n");
            for descriptor in protected_enums {
                self.write_enum(out, class, descriptor)?;
            }
            write_methods(out, &protected);
        }

        let protected_slots = self.live_methods(class.methods_in(MethodCategory::ProtectedSlot), true);
        if !protected_slots.is_empty() {
            out.push_str("protected slots:\n");
            write_methods(out, &protected_slots);
        }

        let signals = self.live_methods(class.methods_in(MethodCategory::Signal), true);
        if !signals.is_empty() {
            out.push_str("signals:\n");
            write_methods(out, &signals);
        }

        let private_declared = self.metadata.private_declared.contains(&class.name);
        let copy_disabled = self.metadata.copy_disabled.contains(&class.name);
        if private_declared || copy_disabled {
            out.push_str("private:\n");
            if private_declared {
                out.push_str(&format!("  {0}(const {0} &);\n", class.name));
            }
            if copy_disabled {
                out.push_str(&format!("  {0} &operator=(const {0} &);\n", class.name));
            }
        }

        out.push_str("\n};\n\n");
        Ok(())
    }

    fn write_type_header_code(
        &self,
        out: &mut String,
    ) {
        out.push_str("%TypeHeaderCode\n");
        out.push_str(&format!("#include \"{}\"\n", self.header_name));
        out.push_str("%End\n\n");
    }

    fn write_enum(
        &self,
        out: &mut String,
        class: &ClassDescriptor,
        descriptor: &EnumDescriptor,
    ) -> Result<()> {
        let qualified = match &descriptor.name {
            Some(name) => format!("{}::{name}", class.name),
            None => format!("{}::(anonymous)", class.name),
        };
        let enumerators = resolve_enumerators(descriptor, &qualified)?;

        match &descriptor.name {
            Some(name) => out.push_str(&format!("  enum {name} {{\n")),
            None => out.push_str("  enum {\n"),
        }
        for enumerator in enumerators {
            match enumerator.value {
                Some(value) => out.push_str(&format!("    {}={value},\n", enumerator.name)),
                None => out.push_str(&format!("    {},\n", enumerator.name)),
            }
        }
        out.push_str("  };\n");
        if let Some(name) = &descriptor.name
            && let Some(alias) = self.metadata.flag_alias(name)
        {
            out.push_str(&format!("  typedef QFlags<{}::{name}> {alias};\n", class.name));
        }
        out.push('\n');
        Ok(())
    }

    fn live_enums<'c>(
        &self,
        class: &'c ClassDescriptor,
        access: Access,
    ) -> Vec<&'c EnumDescriptor> {
        class
            .enums_with(access)
            .filter(|descriptor| {
                let skipped = self.skip.is_skipped(descriptor.line);
                if skipped {
                    debug!("SKIP: enum {} at line {}", descriptor.name.as_deref().unwrap_or("[ENUM]"), descriptor.line);
                }
                !skipped
            })
            .collect()
    }

    fn live_methods<'m>(
        &self,
        methods: impl Iterator<Item = &'m MethodDescriptor>,
        include_constructors: bool,
    ) -> Vec<&'m MethodDescriptor> {
        methods
            .filter(|method| include_constructors || !method.is_constructor)
            .filter(|method| {
                let skipped = self.skip.is_skipped(method.line);
                if skipped {
                    debug!("SKIP: {} at line {}", method.name, method.line);
                }
                !skipped
            })
            .collect()
    }
}

/// Method lines followed by the blank line that closes every group.
fn write_methods(
    out: &mut String,
    methods: &[&MethodDescriptor],
) {
    for method in methods {
        out.push_str(&method_line(method));
    }
    out.push('\n');
}

/// Synthesize one header in a single call.
pub fn synthesize(
    ast: &HeaderAst,
    skip: &SkipRanges,
    metadata: &ExportMetadata,
    header_name: &str,
) -> Result<Synthesis> {
    Synthesizer::new(ast, skip, metadata, header_name).synthesize()
}

#[cfg(test)]
#[path = "../../tests/src/synth/synth_tests.rs"]
mod tests;
