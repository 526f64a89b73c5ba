//! `$ref`, `$dynamicRef` and `$recursiveRef`.
//!
//! Targets are compiled with the rest of the tree, so a reference is an index into the
//! arena. Dynamic references pick their target from the resources the evaluation went
//! through.
use serde_json::{Map, Value};

use crate::{
    compiler,
    context::{ExecutionContext, Halt},
    keywords::CompilationResult,
    node::{NodeId, Scope},
    validator::{BoxedValidator, Validate},
};

pub(crate) struct RefValidator {
    node: NodeId,
}

impl Validate for RefValidator {
    fn validate<'i>(
        &self,
        instance: &'i Value,
        scope: &Scope<'_>,
        ctx: &mut ExecutionContext<'_, 'i>,
    ) -> Result<(), Halt> {
        ctx.evaluate(self.node, instance, scope.instance_location, scope.path)
    }
}

pub(crate) struct DynamicRefValidator {
    node: NodeId,
    anchor: String,
}

impl Validate for DynamicRefValidator {
    fn validate<'i>(
        &self,
        instance: &'i Value,
        scope: &Scope<'_>,
        ctx: &mut ExecutionContext<'_, 'i>,
    ) -> Result<(), Halt> {
        let tree = ctx.tree;
        // The outermost resource that declares the anchor wins
        let node = ctx
            .dynamic_scope()
            .filter_map(|resource| tree.dynamic_anchor(resource, &self.anchor))
            .last()
            .unwrap_or(self.node);
        ctx.evaluate(node, instance, scope.instance_location, scope.path)
    }
}

pub(crate) struct RecursiveRefValidator {
    node: NodeId,
}

impl RecursiveRefValidator {
    fn target(&self, ctx: &ExecutionContext<'_, '_>) -> NodeId {
        let tree = ctx.tree;
        let resource = tree.node(self.node).resource;
        let info = tree.resource(resource);
        if !info.recursive_anchor || info.root != Some(self.node) {
            return self.node;
        }
        let mut target = self.node;
        for resource in ctx.dynamic_scope() {
            let info = tree.resource(resource);
            if !info.recursive_anchor {
                break;
            }
            if let Some(root) = info.root {
                target = root;
            }
        }
        target
    }
}

impl Validate for RecursiveRefValidator {
    fn validate<'i>(
        &self,
        instance: &'i Value,
        scope: &Scope<'_>,
        ctx: &mut ExecutionContext<'_, 'i>,
    ) -> Result<(), Halt> {
        let node = self.target(ctx);
        ctx.evaluate(node, instance, scope.instance_location, scope.path)
    }
}

fn reference<'s>(
    ctx: &compiler::Context<'_, '_>,
    schema: &'s Value,
) -> Result<&'s str, crate::error::SchemaError> {
    schema
        .as_str()
        .ok_or_else(|| ctx.invalid(format!("{schema} is not of type \"string\"")))
}

#[inline]
pub(crate) fn compile_ref(
    ctx: &mut compiler::Context<'_, '_>,
    _: &Map<String, Value>,
    schema: &Value,
) -> Option<CompilationResult> {
    Some(
        reference(ctx, schema)
            .and_then(|reference| ctx.resolve(reference))
            .map(|resolved| Box::new(RefValidator { node: resolved.node }) as BoxedValidator),
    )
}

#[inline]
pub(crate) fn compile_dynamic_ref(
    ctx: &mut compiler::Context<'_, '_>,
    _: &Map<String, Value>,
    schema: &Value,
) -> Option<CompilationResult> {
    Some(
        reference(ctx, schema)
            .and_then(|reference| ctx.resolve(reference))
            .map(|resolved| match resolved.dynamic_anchor {
                Some(anchor) => Box::new(DynamicRefValidator {
                    node: resolved.node,
                    anchor,
                }) as BoxedValidator,
                // Without a dynamic anchor at the target it is a plain reference
                None => Box::new(RefValidator {
                    node: resolved.node,
                }),
            }),
    )
}

#[inline]
pub(crate) fn compile_recursive_ref(
    ctx: &mut compiler::Context<'_, '_>,
    _: &Map<String, Value>,
    schema: &Value,
) -> Option<CompilationResult> {
    Some(
        reference(ctx, schema)
            .and_then(|reference| ctx.resolve(reference))
            .map(|resolved| {
                Box::new(RecursiveRefValidator {
                    node: resolved.node,
                }) as BoxedValidator
            }),
    )
}
