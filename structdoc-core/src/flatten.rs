use tracing::{trace, warn};

use crate::{
    decl::{LoadedFile, StructType},
    reference::{classify, TypeReference},
    resolve::Walk,
    Error, FieldDescription, Frontend, Result, TypeDescription,
};

/// The fields of one struct, and the descriptions it pulled in on the way.
#[derive(Debug)]
pub(crate) struct Flattened {
    pub(crate) fields: Vec<FieldDescription>,
    pub(crate) dependents: Vec<TypeDescription>,
}

impl<F> Walk<'_, F>
where
    F: Frontend,
{
    /// Flattens `st`, declared in `file` of `package` under the (possibly synthetic) name
    /// `enclosing`.
    ///
    /// Embedded structs are resolved and their fields spliced in where they are embedded.
    /// Inline structs are described as `enclosing.Field`.
    pub(crate) fn flatten(
        &mut self,
        file: &LoadedFile,
        st: &StructType,
        enclosing: &str,
        package: &str,
    ) -> Result<Flattened> {
        let mut fields = Vec::with_capacity(st.fields().len());
        let mut dependents = Vec::new();

        for field in st.fields() {
            let reference = classify(field.ty(), file.aliases(), package);

            if field.is_embedded() {
                let embedded = match reference.strip_pointers() {
                    TypeReference::Named(named) => named,
                    TypeReference::Foreign { .. } if self.options.skip_foreign_embeddings() => {
                        warn!(
                            "skipping `{}` embedded in `{enclosing}`: declared outside the module",
                            field.ty()
                        );
                        continue;
                    }
                    _ => {
                        return Err(Error::MalformedEmbedding {
                            enclosing: enclosing.to_string(),
                            embedded: field.ty().to_string(),
                        })
                    }
                };
                if self.embeds_itself(embedded) {
                    return Err(Error::CycleDetected(
                        self.chain(embedded.package(), embedded.name()),
                    ));
                }

                trace!("promoting fields of `{}` into `{enclosing}`", field.ty());
                let promoted: Option<(Vec<FieldDescription>, Vec<TypeDescription>)> =
                    if self.is_active(embedded) {
                        // Its dependents are already being resolved further up the chain.
                        self.promote(embedded)?.map(|fields| (fields, Vec::new()))
                    } else {
                        let mut resolved = self.resolve_embedded(embedded)?.into_iter();
                        resolved
                            .next()
                            .map(|first| (first.into_fields(), resolved.collect()))
                    };
                let Some((promoted, rest)) = promoted else {
                    return Err(Error::MalformedEmbedding {
                        enclosing: enclosing.to_string(),
                        embedded: field.ty().to_string(),
                    });
                };
                fields.extend(promoted);
                dependents.extend(rest);
                continue;
            }

            if let TypeReference::AnonymousComposite(inline) = reference.innermost() {
                for name in field.names() {
                    let synthetic = format!("{enclosing}.{name}");
                    let nested = self.flatten(file, inline, &synthetic, package)?;
                    dependents.push(TypeDescription::new(package, synthetic, nested.fields));
                    dependents.extend(nested.dependents);
                }
            }

            let ty = reference.signature();
            let name = field.external_name(self.options.tag_key());
            for _ in field.names() {
                fields.push(FieldDescription::new(
                    name.as_str(),
                    ty.as_str(),
                    field.description(),
                ));
            }
        }

        Ok(Flattened { fields, dependents })
    }

    /// Resolves the module types referenced by the named fields of `st`, including the fields
    /// of its inline structs, appending them to `types`.
    pub(crate) fn follow(
        &mut self,
        file: &LoadedFile,
        st: &StructType,
        package: &str,
        types: &mut Vec<TypeDescription>,
    ) -> Result<()> {
        for field in st.fields() {
            if field.is_embedded() {
                continue;
            }

            let reference = classify(field.ty(), file.aliases(), package);
            match reference.innermost() {
                TypeReference::Named(named) => {
                    for _ in field.names() {
                        self.resolve_dependent(named, types)?;
                    }
                }
                TypeReference::AnonymousComposite(inline) => {
                    for _ in field.names() {
                        self.follow(file, inline, package, types)?;
                    }
                }
                TypeReference::Builtin(_)
                | TypeReference::Foreign { .. }
                | TypeReference::Opaque
                | TypeReference::Pointer(_)
                | TypeReference::Sequence(_) => (),
            }
        }

        Ok(())
    }
}
