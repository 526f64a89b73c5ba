//! The compiled schema tree.
//!
//! Nodes live in an arena and refer to each other by index, so cyclic references are plain
//! indices. The tree is immutable once built and shared by all evaluations.
use std::{fmt, sync::Arc};

use ahash::AHashMap;
use serde_json::Value;

use crate::{
    context::{ExecutionContext, Halt},
    error::ValidationErrorKind,
    paths::{Location, SchemaLocation},
    validator::BoxedValidator,
    walk::{WalkEvent, WalkFlow},
};

pub(crate) type NodeId = usize;
pub(crate) type ResourceId = usize;

/// Name, location and value of a keyword occurrence.
#[derive(Debug, Clone)]
pub(crate) struct KeywordMeta {
    pub(crate) name: Arc<str>,
    pub(crate) schema_location: SchemaLocation,
    pub(crate) value: Arc<Value>,
}

/// What a keyword validator knows about where it is evaluated.
pub(crate) struct Scope<'s> {
    pub(crate) instance_location: &'s Location,
    /// Evaluation path of the schema the keyword belongs to.
    pub(crate) node_path: &'s Location,
    /// Evaluation path of the keyword itself.
    pub(crate) path: &'s Location,
    pub(crate) keyword: &'s KeywordMeta,
}

pub(crate) struct CompiledKeyword {
    pub(crate) meta: KeywordMeta,
    pub(crate) validator: BoxedValidator,
}

pub(crate) enum NodeBody {
    Accept,
    /// `false` schema. The meta describes the schema itself.
    Reject(KeywordMeta),
    Keywords(Vec<CompiledKeyword>),
}

pub(crate) struct SchemaNode {
    pub(crate) location: SchemaLocation,
    pub(crate) resource: ResourceId,
    /// Enclosing schema in the same document, if any.
    pub(crate) parent: Option<NodeId>,
    pub(crate) body: NodeBody,
}

impl fmt::Debug for SchemaNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keywords: Vec<&str> = match &self.body {
            NodeBody::Accept => vec!["true"],
            NodeBody::Reject(_) => vec!["false"],
            NodeBody::Keywords(keywords) => {
                keywords.iter().map(|keyword| &*keyword.meta.name).collect()
            }
        };
        f.debug_struct("SchemaNode")
            .field("location", &self.location)
            .field("resource", &self.resource)
            .field("parent", &self.parent)
            .field("keywords", &keywords)
            .finish()
    }
}

impl SchemaNode {
    pub(crate) fn evaluate<'i>(
        &self,
        instance: &'i Value,
        instance_location: &Location,
        path: &Location,
        ctx: &mut ExecutionContext<'_, 'i>,
    ) -> Result<(), Halt> {
        let before = ctx.errors.len();
        let entered = ctx.enter_resource(self.resource);
        let result = self.evaluate_keywords(instance, instance_location, path, ctx);
        if entered {
            ctx.leave_resource();
        }
        if ctx.errors.len() > before {
            ctx.results
                .record_failure(instance_location, &self.location, path);
        }
        result
    }

    fn evaluate_keywords<'i>(
        &self,
        instance: &'i Value,
        instance_location: &Location,
        path: &Location,
        ctx: &mut ExecutionContext<'_, 'i>,
    ) -> Result<(), Halt> {
        match &self.body {
            NodeBody::Accept => Ok(()),
            NodeBody::Reject(meta) => {
                let scope = Scope {
                    instance_location,
                    node_path: path,
                    path,
                    keyword: meta,
                };
                ctx.report(&scope, instance, ValidationErrorKind::FalseSchema)
            }
            NodeBody::Keywords(keywords) => {
                for keyword in keywords {
                    let keyword_path = path.join_shared(&keyword.meta.name);
                    let scope = Scope {
                        instance_location,
                        node_path: path,
                        path: &keyword_path,
                        keyword: &keyword.meta,
                    };
                    if ctx.is_walking() {
                        let event = WalkEvent {
                            keyword: &keyword.meta.name,
                            instance,
                            schema: &keyword.meta.value,
                            instance_location,
                            evaluation_path: &keyword_path,
                            schema_location: &keyword.meta.schema_location,
                        };
                        if ctx.walk_start(&event) == WalkFlow::Skip {
                            continue;
                        }
                        let since = ctx.errors.len();
                        let result = keyword.validator.validate(instance, &scope, ctx);
                        ctx.walk_end(&event, since);
                        result?;
                    } else {
                        keyword.validator.validate(instance, &scope, ctx)?;
                    }
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct ResourceInfo {
    pub(crate) base: Arc<str>,
    /// Root node of the resource, if it was compiled.
    pub(crate) root: Option<NodeId>,
    /// `$recursiveAnchor: true` at the resource root.
    pub(crate) recursive_anchor: bool,
}

/// Arena of compiled schemas.
#[derive(Debug)]
pub(crate) struct SchemaTree {
    nodes: Vec<SchemaNode>,
    resources: Vec<ResourceInfo>,
    dynamic_anchors: AHashMap<ResourceId, AHashMap<String, NodeId>>,
    root: NodeId,
    has_unevaluated: bool,
}

impl SchemaTree {
    pub(crate) fn new(
        nodes: Vec<SchemaNode>,
        resources: Vec<ResourceInfo>,
        dynamic_anchors: AHashMap<ResourceId, AHashMap<String, NodeId>>,
        root: NodeId,
        has_unevaluated: bool,
    ) -> Self {
        Self {
            nodes,
            resources,
            dynamic_anchors,
            root,
            has_unevaluated,
        }
    }
    pub(crate) fn node(&self, id: NodeId) -> &SchemaNode {
        &self.nodes[id]
    }
    pub(crate) fn root(&self) -> NodeId {
        self.root
    }
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }
    /// Whether any schema uses `unevaluatedProperties` or `unevaluatedItems`.
    pub(crate) fn has_unevaluated(&self) -> bool {
        self.has_unevaluated
    }
    pub(crate) fn dynamic_anchor(&self, resource: ResourceId, name: &str) -> Option<NodeId> {
        self.dynamic_anchors
            .get(&resource)
            .and_then(|anchors| anchors.get(name))
            .copied()
    }
    pub(crate) fn resource(&self, id: ResourceId) -> &ResourceInfo {
        &self.resources[id]
    }
}
