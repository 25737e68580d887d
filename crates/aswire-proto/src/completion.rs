//! Completion payloads: imported element sets over an interned string
//! table, existing imports, and available suggestion sets.

use crate::element::Element;
use aswire_core::{protocol_object, table, Cursor, DecodeConfig, Interner, Problem, Result};
use std::collections::HashSet;

protocol_object! {
    /// `(uri, name)` pairs stored as parallel index arrays into `strings`.
    #[derive(Eq, Hash)]
    pub struct ImportedElementSet {
        /// Interned strings; no string appears twice.
        required strings: Vec<String> = "strings",
        required uris: Vec<i64> = "uris",
        required names: Vec<i64> = "names",
    }
    validate = check_element_set;
}

fn check_element_set(set: &ImportedElementSet, cx: &Cursor<'_>) -> Result<()> {
    table::check_unique_strings(&set.strings, &cx.field("strings"))?;
    table::check_parallel(("uris", set.uris.len()), ("names", set.names.len()), cx)?;
    table::check_indices(set.strings.len(), &set.uris, "strings", &cx.field("uris"))?;
    table::check_indices(set.strings.len(), &set.names, "strings", &cx.field("names"))
}

/// One resolved `(uri, name)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImportedElement<'a> {
    pub uri: &'a str,
    pub name: &'a str,
}

impl ImportedElementSet {
    /// Number of `(uri, name)` pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.uris.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.uris.is_empty()
    }

    /// Resolve the pair at `index`.
    pub fn element(&self, index: i64) -> Result<ImportedElement<'_>> {
        let config = DecodeConfig::default();
        let cx = Cursor::root("ImportedElementSet", &config);
        self.element_at(index, &cx)
    }

    fn element_at(&self, index: i64, cx: &Cursor<'_>) -> Result<ImportedElement<'_>> {
        let uri = *table::lookup(&self.uris, index, "uris", &cx.field("uris"))?;
        let name = *table::lookup(&self.names, index, "names", &cx.field("names"))?;
        Ok(ImportedElement {
            uri: table::lookup(&self.strings, uri, "strings", &cx.field("strings"))?,
            name: table::lookup(&self.strings, name, "strings", &cx.field("strings"))?,
        })
    }

    /// Every pair in order. Duplicate pairs are kept.
    pub fn resolve(&self) -> Result<Vec<ImportedElement<'_>>> {
        let config = DecodeConfig::default();
        let cx = Cursor::root("ImportedElementSet", &config);
        (0..self.len())
            .map(|i| self.element_at(table_index(i), &cx))
            .collect()
    }

    #[must_use]
    pub fn from_resolved(elements: &[ImportedElement<'_>]) -> Self {
        let mut builder = ImportedElementSetBuilder::new();
        for element in elements {
            builder.push(element.uri, element.name);
        }
        builder.build()
    }
}

#[allow(clippy::cast_possible_wrap)]
fn table_index(i: usize) -> i64 {
    i as i64
}

/// Builds an `ImportedElementSet`, interning strings in first-occurrence
/// order.
#[derive(Debug, Clone, Default)]
pub struct ImportedElementSetBuilder {
    strings: Interner<String>,
    uris: Vec<i64>,
    names: Vec<i64>,
}

impl ImportedElementSetBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pair and return its index.
    pub fn push(&mut self, uri: &str, name: &str) -> i64 {
        let index = table_index(self.uris.len());
        self.uris.push(self.strings.intern(&uri.to_string()));
        self.names.push(self.strings.intern(&name.to_string()));
        index
    }

    #[must_use]
    pub fn build(self) -> ImportedElementSet {
        ImportedElementSet {
            strings: self.strings.into_entries(),
            uris: self.uris,
            names: self.names,
        }
    }
}

protocol_object! {
    /// A library imported by the file being completed.
    #[derive(Eq, Hash)]
    pub struct ExistingImport {
        /// Index into `ImportedElementSet::strings`.
        required uri: i64 = "uri",
        /// Indices of pairs in the enclosing `ImportedElementSet`.
        required elements: Vec<i64> = "elements",
    }
}

protocol_object! {
    #[derive(Eq, Hash)]
    pub struct ExistingImports {
        required elements: ImportedElementSet = "elements",
        required imports: Vec<ExistingImport> = "imports",
    }
    validate = check_existing_imports;
}

fn check_existing_imports(imports: &ExistingImports, cx: &Cursor<'_>) -> Result<()> {
    let set = &imports.elements;
    let imports_cx = cx.field("imports");
    for (i, import) in imports.imports.iter().enumerate() {
        let import_cx = imports_cx.index(i);
        table::lookup(&set.strings, import.uri, "strings", &import_cx.field("uri"))?;
        let elements_cx = import_cx.field("elements");
        table::check_indices(set.len(), &import.elements, "elements", &elements_cx)?;
    }
    Ok(())
}

/// An import with its uri and element pairs bound.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedImport<'a> {
    pub uri: &'a str,
    pub elements: Vec<ImportedElement<'a>>,
}

impl ExistingImports {
    pub fn resolve(&self) -> Result<Vec<ResolvedImport<'_>>> {
        let config = DecodeConfig::default();
        let cx = Cursor::root("ExistingImports", &config);
        let imports_cx = cx.field("imports");
        let elements_cx = cx.field("elements");

        let mut resolved = Vec::with_capacity(self.imports.len());
        for (i, import) in self.imports.iter().enumerate() {
            let import_cx = imports_cx.index(i);
            let uri = table::lookup(
                &self.elements.strings,
                import.uri,
                "strings",
                &import_cx.field("uri"),
            )?;
            let indices_cx = import_cx.field("elements");
            let elements = import
                .elements
                .iter()
                .enumerate()
                .map(|(j, &index)| {
                    let at = indices_cx.index(j);
                    table::position(self.elements.len(), index, "elements", &at)?;
                    self.elements.element_at(index, &elements_cx)
                })
                .collect::<Result<Vec<_>>>()?;
            resolved.push(ResolvedImport { uri, elements });
        }
        Ok(resolved)
    }

    #[must_use]
    pub fn from_resolved(imports: &[ResolvedImport<'_>]) -> Self {
        let mut builder = ExistingImportsBuilder::new();
        for import in imports {
            builder.add_import(import.uri, &import.elements);
        }
        builder.build()
    }
}

/// Builds `ExistingImports`. Strings are interned in the order they are
/// first seen, and each distinct pair is stored once.
#[derive(Debug, Clone, Default)]
pub struct ExistingImportsBuilder {
    strings: Interner<String>,
    pairs: Interner<(i64, i64)>,
    imports: Vec<ExistingImport>,
}

impl ExistingImportsBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_import(&mut self, uri: &str, elements: &[ImportedElement<'_>]) {
        let uri = self.strings.intern(&uri.to_string());
        let elements = elements
            .iter()
            .map(|element| {
                let pair = (
                    self.strings.intern(&element.uri.to_string()),
                    self.strings.intern(&element.name.to_string()),
                );
                self.pairs.intern(&pair)
            })
            .collect();
        self.imports.push(ExistingImport { uri, elements });
    }

    #[must_use]
    pub fn build(self) -> ExistingImports {
        let (uris, names) = self.pairs.into_entries().into_iter().unzip();
        ExistingImports {
            elements: ImportedElementSet {
                strings: self.strings.into_entries(),
                uris,
                names,
            },
            imports: self.imports,
        }
    }
}

protocol_object! {
    /// Params of the `completion.existingImports` notification.
    #[derive(Eq, Hash)]
    pub struct CompletionExistingImportsParams {
        required file: String = "file",
        required imports: ExistingImports = "imports",
    }
}

protocol_object! {
    /// A declaration that can be suggested without being imported yet.
    #[derive(Eq, Hash)]
    pub struct AvailableSuggestion {
        required label: String = "label",
        required declaring_library_uri: String = "declaringLibraryUri",
        required element: Element = "element",
        optional default_argument_list_string: String = "defaultArgumentListString",
        optional default_argument_list_text_ranges: Vec<i64> = "defaultArgumentListTextRanges",
        optional parameter_names: Vec<String> = "parameterNames",
        optional parameter_types: Vec<String> = "parameterTypes",
        optional relevance_tags: Vec<String> = "relevanceTags",
        optional required_parameter_count: i64 = "requiredParameterCount",
    }
}

protocol_object! {
    /// The suggestions of one library, referenced elsewhere by `id`.
    #[derive(Eq, Hash)]
    pub struct AvailableSuggestionSet {
        required id: i64 = "id",
        required uri: String = "uri",
        required items: Vec<AvailableSuggestion> = "items",
    }
}

protocol_object! {
    /// A reference to a suggestion set that applies to a completion request.
    #[derive(Eq, Hash)]
    pub struct IncludedSuggestionSet {
        required id: i64 = "id",
        required relevance: i64 = "relevance",
        optional display_uri: String = "displayUri",
    }
}

protocol_object! {
    /// Params of the `completion.availableSuggestions` notification.
    #[derive(Eq, Hash)]
    pub struct CompletionAvailableSuggestionsParams {
        optional changed_libraries: Vec<AvailableSuggestionSet> = "changedLibraries",
        /// Ids of previously sent sets that are gone.
        optional removed_libraries: Vec<i64> = "removedLibraries",
    }
    validate = check_suggestion_ids;
}

fn check_suggestion_ids(
    params: &CompletionAvailableSuggestionsParams,
    cx: &Cursor<'_>,
) -> Result<()> {
    let Some(sets) = &params.changed_libraries else {
        return Ok(());
    };
    let sets_cx = cx.field("changedLibraries");
    let mut seen = HashSet::with_capacity(sets.len());
    for (i, set) in sets.iter().enumerate() {
        if !seen.insert(set.id) {
            return Err(sets_cx
                .index(i)
                .field("id")
                .malformed(Problem::DuplicateId(set.id)));
        }
    }
    Ok(())
}

impl CompletionAvailableSuggestionsParams {
    /// The changed set with `id`, if this message carries it.
    #[must_use]
    pub fn suggestion_set(&self, id: i64) -> Option<&AvailableSuggestionSet> {
        self.changed_libraries
            .as_deref()
            .unwrap_or_default()
            .iter()
            .find(|set| set.id == id)
    }
}

impl IncludedSuggestionSet {
    /// The set this entry refers to, looked up in `params`.
    #[must_use]
    pub fn resolve<'a>(
        &self,
        params: &'a CompletionAvailableSuggestionsParams,
    ) -> Option<&'a AvailableSuggestionSet> {
        params.suggestion_set(self.id)
    }
}
