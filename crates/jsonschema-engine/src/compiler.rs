//! Building the schema tree.
//!
//! Documents are indexed first: every subschema position gets its base IRI, its fragment
//! relative to its resource and its dialect, and every `$id`, `$anchor` and `$dynamicAnchor`
//! is registered. Nodes are compiled on demand, starting from the root. A node is reserved in
//! the arena before its keywords are compiled, so references back to it resolve to its index.
use std::sync::Arc;

use ahash::AHashMap;
use jsonschema_dialect::{iri, meta, Dialect, DialectRegistry, Draft, KeywordKind};
use serde_json::{Map, Value};
use url::Url;

use crate::{
    error::SchemaError,
    keywords::{self, annotation::AnnotationValidator},
    node::{
        CompiledKeyword, KeywordMeta, NodeBody, NodeId, ResourceId, ResourceInfo, SchemaNode,
        SchemaTree,
    },
    options::{UnknownKeywordPolicy, ValidationOptions},
    paths::{write_escaped_str, Location, LocationSegment, SchemaLocation},
    regex_engine::Regex,
    retriever::WithResources,
};

type DocumentId = usize;

#[derive(Debug, Clone)]
struct Position {
    base: Arc<str>,
    fragment: Location,
    dialect: Arc<Dialect>,
    resource: ResourceId,
}

#[derive(Debug, Clone)]
struct Anchor {
    document: DocumentId,
    pointer: String,
    dynamic: bool,
}

#[derive(Debug)]
struct Resource {
    document: DocumentId,
    pointer: String,
    info: ResourceInfo,
    dynamic_anchors: Vec<(String, String)>,
    active: bool,
}

/// A reference target.
pub(crate) struct Resolved {
    pub(crate) node: NodeId,
    /// Name of the `$dynamicAnchor` the reference landed on.
    pub(crate) dynamic_anchor: Option<String>,
}

pub(crate) struct Compiler<'a> {
    options: &'a ValidationOptions,
    registry: &'a dyn DialectRegistry,
    retriever: WithResources<'a>,
    documents: Vec<Arc<Value>>,
    positions: AHashMap<(DocumentId, String), Position>,
    resources: Vec<Resource>,
    resources_by_iri: AHashMap<String, ResourceId>,
    anchors: AHashMap<String, Anchor>,
    nodes: Vec<Option<SchemaNode>>,
    compiled: AHashMap<(DocumentId, String), NodeId>,
    regexes: AHashMap<String, Regex>,
    has_unevaluated: bool,
}

/// Compile `schema` into a schema tree.
pub(crate) fn build(options: &ValidationOptions, schema: &Value) -> Result<SchemaTree, SchemaError> {
    let mut compiler = Compiler::new(options);
    let dialect = compiler.dialect_of(schema, None)?;
    let base = iri::parse(iri::DEFAULT_BASE_IRI)?;
    let document = compiler.add_document(&base, schema.clone(), dialect)?;
    let root = compiler.compile_node(document, "")?;
    let dynamic_anchors = compiler.compile_dynamic_scopes()?;
    compiler.finish(root, dynamic_anchors)
}

impl<'a> Compiler<'a> {
    fn new(options: &'a ValidationOptions) -> Self {
        Self {
            options,
            registry: options.dialect_registry(),
            retriever: WithResources {
                resources: &options.resources,
                inner: &*options.retriever,
            },
            documents: Vec::new(),
            positions: AHashMap::new(),
            resources: Vec::new(),
            resources_by_iri: AHashMap::new(),
            anchors: AHashMap::new(),
            nodes: Vec::new(),
            compiled: AHashMap::new(),
            regexes: AHashMap::new(),
            has_unevaluated: false,
        }
    }

    /// The dialect a document declares, or the one it inherits.
    fn dialect_of(
        &self,
        contents: &Value,
        inherited: Option<&Arc<Dialect>>,
    ) -> Result<Arc<Dialect>, SchemaError> {
        match (Draft::declared_dialect(contents), inherited) {
            (Some(declared), _) => Ok(self.registry.get_dialect(declared, &self.retriever)?),
            (None, Some(inherited)) => Ok(Arc::clone(inherited)),
            (None, None) => Ok(self
                .registry
                .get_dialect(self.options.default_dialect(), &self.retriever)?),
        }
    }

    fn add_document(
        &mut self,
        iri: &Url,
        contents: Value,
        dialect: Arc<Dialect>,
    ) -> Result<DocumentId, SchemaError> {
        let document = self.documents.len();
        let contents = Arc::new(contents);
        self.documents.push(Arc::clone(&contents));
        let base = iri::without_fragment(iri);
        let resource = self.add_resource(&base, document, "");
        self.index(
            document,
            String::new(),
            &contents,
            &base,
            resource,
            Location::new(),
            &dialect,
        )?;
        tracing::debug!(iri = %base, dialect = %dialect.id(), "indexed schema document");
        Ok(document)
    }

    fn add_resource(&mut self, base: &Url, document: DocumentId, pointer: &str) -> ResourceId {
        if let Some(existing) = self.resources_by_iri.get(base.as_str()) {
            return *existing;
        }
        let id = self.resources.len();
        self.resources.push(Resource {
            document,
            pointer: pointer.to_string(),
            info: ResourceInfo {
                base: Arc::from(base.as_str()),
                root: None,
                recursive_anchor: false,
            },
            dynamic_anchors: Vec::new(),
            active: false,
        });
        self.resources_by_iri.insert(base.as_str().to_string(), id);
        id
    }

    #[allow(clippy::too_many_arguments)]
    fn index(
        &mut self,
        document: DocumentId,
        pointer: String,
        schema: &Value,
        base: &Url,
        resource: ResourceId,
        fragment: Location,
        dialect: &Arc<Dialect>,
    ) -> Result<(), SchemaError> {
        let Value::Object(object) = schema else {
            self.positions.insert(
                (document, pointer),
                Position {
                    base: Arc::clone(&self.resources[resource].info.base),
                    fragment,
                    dialect: Arc::clone(dialect),
                    resource,
                },
            );
            return Ok(());
        };
        let ignores_siblings = dialect.draft().ignores_ref_siblings() && object.contains_key("$ref");
        let declared_id = dialect.read_id(schema).filter(|_| !ignores_siblings);
        let mut dialect = Arc::clone(dialect);
        if !pointer.is_empty() && declared_id.is_some() {
            dialect = self.dialect_of(schema, Some(&dialect))?;
        }
        let (mut base, mut resource, mut fragment) = (base.clone(), resource, fragment);
        if let Some(id) = declared_id {
            if let Some(name) = id.strip_prefix('#').filter(|_| dialect.draft() <= Draft::Draft7) {
                // Location-independent identifier of drafts 4 to 7
                if !name.is_empty() && !name.starts_with('/') {
                    self.add_anchor(&base, name, document, &pointer, false);
                }
            } else {
                let resolved = iri::resolve(&base, id)?;
                base = iri::without_fragment(&resolved);
                if pointer.is_empty() {
                    // The document is known under its retrieval IRI too
                    self.resources[resource].info.base = Arc::from(base.as_str());
                    self.resources_by_iri
                        .entry(base.as_str().to_string())
                        .or_insert(resource);
                } else {
                    resource = self.add_resource(&base, document, &pointer);
                }
                fragment = Location::new();
                if let Some(name) = resolved.fragment().filter(|name| {
                    !name.is_empty() && !name.starts_with('/') && dialect.draft() <= Draft::Draft7
                }) {
                    let name = name.to_string();
                    self.add_anchor(&base, &name, document, &pointer, false);
                }
            }
        }
        if dialect.keyword("$anchor").is_some() {
            if let Some(name) = object.get("$anchor").and_then(Value::as_str) {
                self.add_anchor(&base, name, document, &pointer, false);
            }
        }
        if dialect.keyword("$dynamicAnchor").is_some() {
            if let Some(name) = object.get("$dynamicAnchor").and_then(Value::as_str) {
                self.add_anchor(&base, name, document, &pointer, true);
                self.resources[resource]
                    .dynamic_anchors
                    .push((name.to_string(), pointer.clone()));
            }
        }
        if dialect.keyword("$recursiveAnchor").is_some()
            && fragment.is_empty()
            && object.get("$recursiveAnchor") == Some(&Value::Bool(true))
        {
            self.resources[resource].info.recursive_anchor = true;
        }
        self.positions.insert(
            (document, pointer.clone()),
            Position {
                base: Arc::clone(&self.resources[resource].info.base),
                fragment: fragment.clone(),
                dialect: Arc::clone(&dialect),
                resource,
            },
        );
        for (keyword, value) in object {
            let keyword = keyword.as_str();
            match keyword {
                "additionalItems" | "additionalProperties" | "contains" | "contentSchema"
                | "else" | "if" | "not" | "propertyNames" | "then" | "unevaluatedItems"
                | "unevaluatedProperties" => {
                    self.index_child(document, &pointer, &[keyword], value, &base, resource, &fragment, &dialect)?;
                }
                "items" if value.is_array() => {
                    self.index_items(document, &pointer, keyword, value, &base, resource, &fragment, &dialect)?;
                }
                "items" => {
                    self.index_child(document, &pointer, &[keyword], value, &base, resource, &fragment, &dialect)?;
                }
                "allOf" | "anyOf" | "oneOf" | "prefixItems" => {
                    self.index_items(document, &pointer, keyword, value, &base, resource, &fragment, &dialect)?;
                }
                "$defs" | "definitions" | "dependentSchemas" | "patternProperties"
                | "properties" | "dependencies" => {
                    if let Value::Object(children) = value {
                        for (name, child) in children {
                            if child.is_object() || child.is_boolean() {
                                self.index_child(document, &pointer, &[keyword, name.as_str()], child, &base, resource, &fragment, &dialect)?;
                            }
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn index_items(
        &mut self,
        document: DocumentId,
        pointer: &str,
        keyword: &str,
        value: &Value,
        base: &Url,
        resource: ResourceId,
        fragment: &Location,
        dialect: &Arc<Dialect>,
    ) -> Result<(), SchemaError> {
        if let Value::Array(items) = value {
            for (idx, item) in items.iter().enumerate() {
                let idx = itoa::Buffer::new().format(idx).to_string();
                self.index_child(document, pointer, &[keyword, &idx], item, base, resource, fragment, dialect)?;
            }
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn index_child(
        &mut self,
        document: DocumentId,
        pointer: &str,
        segments: &[&str],
        value: &Value,
        base: &Url,
        resource: ResourceId,
        fragment: &Location,
        dialect: &Arc<Dialect>,
    ) -> Result<(), SchemaError> {
        let mut child_pointer = pointer.to_string();
        let mut child_fragment = fragment.clone();
        for segment in segments {
            child_pointer.push('/');
            write_escaped_str(&mut child_pointer, segment);
            child_fragment = child_fragment.join(*segment);
        }
        self.index(
            document,
            child_pointer,
            value,
            base,
            resource,
            child_fragment,
            dialect,
        )
    }

    fn add_anchor(
        &mut self,
        base: &Url,
        name: &str,
        document: DocumentId,
        pointer: &str,
        dynamic: bool,
    ) {
        self.anchors
            .entry(format!("{base}#{name}"))
            .or_insert_with(|| Anchor {
                document,
                pointer: pointer.to_string(),
                dynamic,
            });
    }

    /// Position of a pointer that was not reached by indexing, e.g. a reference into an
    /// unknown keyword. It extends the closest indexed ancestor, and its subtree is indexed.
    fn position(&mut self, document: DocumentId, pointer: &str) -> Result<Position, SchemaError> {
        if let Some(position) = self.positions.get(&(document, pointer.to_string())) {
            return Ok(position.clone());
        }
        let mut end = pointer.len();
        let ancestor = loop {
            match pointer[..end].rfind('/') {
                Some(idx) => {
                    end = idx;
                    if let Some(position) = self.positions.get(&(document, pointer[..end].to_string())) {
                        break position.clone();
                    }
                }
                None => {
                    return Err(SchemaError::invalid_schema(
                        &SchemaLocation::new(Arc::from(iri::DEFAULT_BASE_IRI), Location::new()),
                        format!("'{pointer}' is outside of any indexed schema"),
                    ))
                }
            }
        };
        let fragment = ancestor
            .fragment
            .extend(&Location::from_pointer(&pointer[end..]));
        let contents = Arc::clone(&self.documents[document]);
        if let Some(schema) = contents.pointer(pointer) {
            let base = iri::parse(&ancestor.base)?;
            self.index(
                document,
                pointer.to_string(),
                schema,
                &base,
                ancestor.resource,
                fragment.clone(),
                &ancestor.dialect,
            )?;
        }
        Ok(self
            .positions
            .get(&(document, pointer.to_string()))
            .cloned()
            .unwrap_or(Position { fragment, ..ancestor }))
    }

    fn lexical_parent(&self, document: DocumentId, pointer: &str) -> Option<NodeId> {
        let mut end = pointer.len();
        while let Some(idx) = pointer[..end].rfind('/') {
            end = idx;
            if let Some(node) = self.compiled.get(&(document, pointer[..end].to_string())) {
                return Some(*node);
            }
        }
        None
    }

    pub(crate) fn compile_node(
        &mut self,
        document: DocumentId,
        pointer: &str,
    ) -> Result<NodeId, SchemaError> {
        if let Some(node) = self.compiled.get(&(document, pointer.to_string())) {
            return Ok(*node);
        }
        let position = self.position(document, pointer)?;
        let location = SchemaLocation::new(Arc::clone(&position.base), position.fragment.clone());
        let contents = Arc::clone(&self.documents[document]);
        let Some(schema) = contents.pointer(pointer) else {
            return Err(SchemaError::unresolvable(
                format!("#{pointer}"),
                &location,
                None,
            ));
        };
        let parent = self.lexical_parent(document, pointer);
        let id = self.nodes.len();
        self.nodes.push(None);
        self.compiled.insert((document, pointer.to_string()), id);
        let resource = &mut self.resources[position.resource];
        resource.active = true;
        if position.fragment.is_empty() && resource.info.root.is_none() {
            resource.info.root = Some(id);
        }
        let body = match schema {
            Value::Bool(true) => NodeBody::Accept,
            Value::Bool(false) => NodeBody::Reject(KeywordMeta {
                name: Arc::from("false"),
                schema_location: location.clone(),
                value: Arc::new(Value::Bool(false)),
            }),
            Value::Object(object) => NodeBody::Keywords(self.compile_keywords(
                document, pointer, object, &position, &location,
            )?),
            other => {
                return Err(SchemaError::invalid_schema(
                    &location,
                    format!("{other} is not of types \"boolean\", \"object\""),
                ))
            }
        };
        self.nodes[id] = Some(SchemaNode {
            location,
            resource: position.resource,
            parent,
            body,
        });
        Ok(id)
    }

    fn compile_keywords(
        &mut self,
        document: DocumentId,
        pointer: &str,
        object: &Map<String, Value>,
        position: &Position,
        location: &SchemaLocation,
    ) -> Result<Vec<CompiledKeyword>, SchemaError> {
        let dialect = Arc::clone(&position.dialect);
        let draft = dialect.draft();
        let only_ref = draft.ignores_ref_siblings() && object.contains_key("$ref");
        let options = self.options;
        let mut compiled = Vec::with_capacity(object.len());
        for (name, value) in object {
            if only_ref && name != "$ref" {
                continue;
            }
            let keyword_location = location.join(name.as_str());
            let custom = options.keyword_factory(name).cloned();
            let mut ctx = Context {
                compiler: self,
                document,
                pointer,
                position,
                location: &keyword_location,
                keyword: name,
            };
            let validator = if let Some(factory) = custom {
                Some(keywords::custom::compile(&ctx, &*factory, object, value)?)
            } else {
                match dialect.keyword(name) {
                    Some(KeywordKind::Validator) => match keywords::get_for_draft(draft, name) {
                        Some(compile) => compile(&mut ctx, object, value).transpose()?,
                        None => Some(AnnotationValidator::compile()),
                    },
                    Some(KeywordKind::Annotation) => Some(AnnotationValidator::compile()),
                    Some(KeywordKind::NonValidation) => None,
                    None => match options.unknown_keyword_policy() {
                        UnknownKeywordPolicy::Annotate => Some(AnnotationValidator::compile()),
                        UnknownKeywordPolicy::Ignore => None,
                        UnknownKeywordPolicy::Strict => {
                            return Err(SchemaError::UnknownKeyword {
                                keyword: name.clone(),
                                location: location.to_string(),
                            })
                        }
                    },
                }
            };
            if let Some(validator) = validator {
                compiled.push(CompiledKeyword {
                    meta: KeywordMeta {
                        name: Arc::from(name.as_str()),
                        schema_location: keyword_location,
                        value: Arc::new(value.clone()),
                    },
                    validator,
                });
            }
        }
        // `unevaluated*` read the annotations of their siblings
        compiled.sort_by_key(|keyword| is_unevaluated(&keyword.meta.name));
        if compiled
            .iter()
            .any(|keyword| is_unevaluated(&keyword.meta.name))
        {
            self.has_unevaluated = true;
        }
        Ok(compiled)
    }

    fn load_document(
        &mut self,
        iri: &Url,
        referrer: &Arc<Dialect>,
        reference: &str,
        location: &SchemaLocation,
    ) -> Result<DocumentId, SchemaError> {
        let key = iri::normalize(iri.as_str());
        let contents = if let Some(contents) = self.options.resources.get(key) {
            contents.clone()
        } else if let Some(contents) = meta::lookup(key) {
            contents.clone()
        } else {
            tracing::debug!(iri = %iri, "retrieving referenced document");
            self.options
                .retriever
                .retrieve(iri)
                .map_err(|error| SchemaError::unresolvable(reference, location, Some(error)))?
        };
        let dialect = self.dialect_of(&contents, Some(referrer))?;
        self.add_document(iri, contents, dialect)
    }

    /// Resolve `reference` against `base` and compile its target.
    pub(crate) fn resolve(
        &mut self,
        base: &str,
        dialect: &Arc<Dialect>,
        reference: &str,
        location: &SchemaLocation,
    ) -> Result<Resolved, SchemaError> {
        let base = iri::parse(base)?;
        let target = iri::resolve(&base, reference)?;
        let resource_iri = iri::without_fragment(&target);
        let resource = match self.resources_by_iri.get(resource_iri.as_str()) {
            Some(resource) => *resource,
            None => {
                self.load_document(&resource_iri, dialect, reference, location)?;
                match self.resources_by_iri.get(resource_iri.as_str()) {
                    Some(resource) => *resource,
                    None => return Err(SchemaError::unresolvable(reference, location, None)),
                }
            }
        };
        let (document, root) = {
            let resource = &self.resources[resource];
            (resource.document, resource.pointer.clone())
        };
        let fragment = target
            .fragment()
            .map(|fragment| iri::decode_fragment(fragment).into_owned())
            .unwrap_or_default();
        tracing::trace!(reference, target = %target, "resolving reference");
        if fragment.is_empty() {
            Ok(Resolved {
                node: self.compile_node(document, &root)?,
                dynamic_anchor: None,
            })
        } else if fragment.starts_with('/') {
            let pointer = format!("{root}{fragment}");
            if self.documents[document].pointer(&pointer).is_none() {
                return Err(SchemaError::unresolvable(reference, location, None));
            }
            Ok(Resolved {
                node: self.compile_node(document, &pointer)?,
                dynamic_anchor: None,
            })
        } else {
            let Some(anchor) = self.anchors.get(&format!("{resource_iri}#{fragment}")).cloned()
            else {
                return Err(SchemaError::unresolvable(reference, location, None));
            };
            Ok(Resolved {
                node: self.compile_node(anchor.document, &anchor.pointer)?,
                dynamic_anchor: anchor.dynamic.then_some(fragment),
            })
        }
    }

    fn regex(&mut self, pattern: &str, location: &SchemaLocation) -> Result<Regex, SchemaError> {
        if let Some(regex) = self.regexes.get(pattern) {
            return Ok(regex.clone());
        }
        let regex = self
            .options
            .regex_engine()
            .compile(pattern)
            .map_err(|reason| SchemaError::invalid_regex(pattern, location, reason))?;
        self.regexes.insert(pattern.to_string(), regex.clone());
        Ok(regex)
    }

    /// Compile what dynamic references may jump to: the `$dynamicAnchor`s and the roots of
    /// every resource that evaluation can enter. Compiling them may activate more resources.
    fn compile_dynamic_scopes(
        &mut self,
    ) -> Result<AHashMap<ResourceId, AHashMap<String, NodeId>>, SchemaError> {
        let mut compiled: AHashMap<ResourceId, AHashMap<String, NodeId>> = AHashMap::new();
        loop {
            let mut pending = Vec::new();
            for (id, resource) in self.resources.iter().enumerate() {
                if !resource.active {
                    continue;
                }
                for (name, pointer) in &resource.dynamic_anchors {
                    if !compiled.get(&id).map_or(false, |anchors| anchors.contains_key(name)) {
                        pending.push((id, Some(name.clone()), resource.document, pointer.clone()));
                    }
                }
                if resource.info.recursive_anchor && resource.info.root.is_none() {
                    pending.push((id, None, resource.document, resource.pointer.clone()));
                }
            }
            if pending.is_empty() {
                return Ok(compiled);
            }
            for (resource, name, document, pointer) in pending {
                let node = self.compile_node(document, &pointer)?;
                match name {
                    Some(name) => {
                        compiled.entry(resource).or_default().insert(name, node);
                    }
                    None => {
                        self.resources[resource].info.root.get_or_insert(node);
                    }
                }
            }
        }
    }

    fn finish(
        self,
        root: NodeId,
        dynamic_anchors: AHashMap<ResourceId, AHashMap<String, NodeId>>,
    ) -> Result<SchemaTree, SchemaError> {
        let documents = self.documents.len();
        let Some(nodes) = self.nodes.into_iter().collect::<Option<Vec<_>>>() else {
            return Err(SchemaError::invalid_schema(
                &SchemaLocation::new(Arc::from(iri::DEFAULT_BASE_IRI), Location::new()),
                "schema compilation did not complete",
            ));
        };
        tracing::debug!(nodes = nodes.len(), documents, "built schema tree");
        let resources = self
            .resources
            .into_iter()
            .map(|resource| resource.info)
            .collect();
        Ok(SchemaTree::new(
            nodes,
            resources,
            dynamic_anchors,
            root,
            self.has_unevaluated,
        ))
    }
}

fn is_unevaluated(keyword: &str) -> bool {
    matches!(keyword, "unevaluatedProperties" | "unevaluatedItems")
}

/// What a keyword sees while it is compiled.
pub(crate) struct Context<'c, 'a> {
    compiler: &'c mut Compiler<'a>,
    document: DocumentId,
    pointer: &'c str,
    position: &'c Position,
    location: &'c SchemaLocation,
    keyword: &'c str,
}

impl<'c, 'a> Context<'c, 'a> {
    pub(crate) fn draft(&self) -> Draft {
        self.position.dialect.draft()
    }
    pub(crate) fn dialect(&self) -> &Dialect {
        &self.position.dialect
    }
    pub(crate) fn options(&self) -> &'a ValidationOptions {
        self.compiler.options
    }
    /// Name of the keyword being compiled.
    pub(crate) fn keyword(&self) -> &'c str {
        self.keyword
    }
    /// Location of the keyword being compiled.
    pub(crate) fn location(&self) -> &SchemaLocation {
        self.location
    }
    /// Compile the subschema at `segments` below the current schema.
    pub(crate) fn subschema<'s>(
        &mut self,
        segments: impl IntoIterator<Item = LocationSegment<'s>>,
    ) -> Result<NodeId, SchemaError> {
        let mut pointer = self.pointer.to_string();
        for segment in segments {
            pointer.push('/');
            match segment {
                LocationSegment::Property(property) => write_escaped_str(&mut pointer, property),
                LocationSegment::Index(idx) => pointer.push_str(itoa::Buffer::new().format(idx)),
            }
        }
        self.compiler.compile_node(self.document, &pointer)
    }
    /// Compile the subschema under the current keyword.
    pub(crate) fn keyword_subschema(&mut self) -> Result<NodeId, SchemaError> {
        let keyword = self.keyword;
        self.subschema([LocationSegment::Property(keyword)])
    }
    /// Compile the target of a reference in the current schema.
    pub(crate) fn resolve(&mut self, reference: &str) -> Result<Resolved, SchemaError> {
        let base = Arc::clone(&self.position.base);
        let dialect = Arc::clone(&self.position.dialect);
        self.compiler
            .resolve(&base, &dialect, reference, self.location)
    }
    pub(crate) fn regex(&mut self, pattern: &str) -> Result<Regex, SchemaError> {
        self.compiler.regex(pattern, self.location)
    }
    /// An error about the value of the current keyword.
    pub(crate) fn invalid(&self, reason: impl Into<String>) -> SchemaError {
        SchemaError::invalid_keyword(self.keyword, self.location, reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options;
    use serde_json::json;

    fn tree(schema: &Value) -> SchemaTree {
        build(&options(), schema).expect("Valid schema")
    }

    #[test]
    fn cyclic_references_compile_once() {
        let schema = json!({
            "$defs": {"node": {"properties": {"next": {"$ref": "#/$defs/node"}}}},
            "$ref": "#/$defs/node"
        });
        // root, node, next
        assert_eq!(tree(&schema).len(), 3);
    }

    #[test]
    fn embedded_resources_get_their_own_base() {
        let schema = json!({
            "$id": "https://example.com/root.json",
            "$defs": {
                "item": {"$id": "item.json", "type": "integer"}
            },
            "properties": {"a": {"$ref": "item.json"}}
        });
        let tree = tree(&schema);
        let locations: Vec<String> = (0..tree.len())
            .map(|id| tree.node(id).location.to_string())
            .collect();
        assert!(locations.contains(&"https://example.com/item.json#".to_string()));
        assert!(locations.contains(&"https://example.com/root.json#/properties/a".to_string()));
    }

    #[test]
    fn anchors() {
        let schema = json!({
            "$ref": "#item",
            "$defs": {"item": {"$anchor": "item", "type": "string"}}
        });
        let tree = tree(&schema);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.node(1).location.to_string(), "json-schema:///#/$defs/item");
        assert_eq!(tree.node(1).parent, Some(0));
    }

    #[test]
    fn legacy_location_independent_identifiers() {
        let schema = json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "allOf": [{"$ref": "#foo"}],
            "definitions": {"A": {"$id": "#foo", "type": "integer"}}
        });
        assert_eq!(tree(&schema).len(), 3);
    }

    #[test]
    fn references_into_unknown_keywords() {
        let schema = json!({
            "x-shared": {"positive": {"minimum": 0}},
            "$ref": "#/x-shared/positive"
        });
        let tree = tree(&schema);
        assert_eq!(
            tree.node(1).location.to_string(),
            "json-schema:///#/x-shared/positive"
        );
    }

    #[test]
    fn references_to_empty_property_names() {
        let schema = json!({
            "": {"type": "integer"},
            "properties": {"a": {"$ref": "#/"}}
        });
        let tree = tree(&schema);
        let locations: Vec<String> = (0..tree.len())
            .map(|id| tree.node(id).location.to_string())
            .collect();
        assert!(locations.contains(&"json-schema:///#/".to_string()));
        let validator = crate::validator_for(&schema).expect("Valid schema");
        assert!(validator.is_valid(&json!({"a": 1})));
        assert!(!validator.is_valid(&json!({"a": "1"})));
    }

    #[test]
    fn unresolvable_reference() {
        let schema = json!({"$ref": "#/$defs/missing"});
        let error = build(&options(), &schema).expect_err("Missing target");
        assert!(matches!(error, SchemaError::Unresolvable { .. }));
    }

    #[test]
    fn unknown_anchor() {
        let schema = json!({"$ref": "#missing"});
        let error = build(&options(), &schema).expect_err("Missing anchor");
        assert!(matches!(error, SchemaError::Unresolvable { .. }));
    }

    #[test]
    fn invalid_subschema_type() {
        let schema = json!({"properties": {"a": 1}});
        let error = build(&options(), &schema).expect_err("Invalid subschema");
        assert!(matches!(error, SchemaError::InvalidSchema { .. }));
    }

    #[test]
    fn unevaluated_keywords_are_detected() {
        assert!(!tree(&json!({"properties": {"a": true}})).has_unevaluated());
        assert!(tree(&json!({"allOf": [{"unevaluatedItems": false}]})).has_unevaluated());
    }

    #[test]
    fn dynamic_anchors_are_compiled() {
        let schema = json!({
            "$id": "https://example.com/tree",
            "$dynamicAnchor": "node",
            "properties": {"children": {"items": {"$dynamicRef": "#node"}}}
        });
        let tree = tree(&schema);
        let resource = tree.node(tree.root()).resource;
        assert_eq!(tree.dynamic_anchor(resource, "node"), Some(tree.root()));
    }
}
