//! Specialization of a shader template
//!
//! `specialize` clones the template and applies, in order:
//! 1. binding / spec constant id remap through a `BindingMap`
//! 2. location 1 / index 0 -> location 0 / index 1 swap for dual-source blending
//! 3. elimination of every undefined input, lowest location first
//!
//! The template itself is never touched.

use spirv as spv;

use crate::error::{Error, Result};
use crate::spirv::annotations::{MarkerKind, ShaderAnnotations};
use crate::spirv::code_buffer::SpirvCodeBuffer;
use crate::spirv::type_graph::{ChainLink, InputVariable, TypeGraph, TypeKind};

/// Ids at or above this value are already final and are never remapped
pub const MAX_NUM_RESOURCE_SLOTS: u32 = 1216;

/// Translates a declared resource slot into its final binding id
pub trait BindingMap {
    fn binding_id(&self, slot: u32) -> Option<u32>;
}

/// Everything that can differ between two specializations of one template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SpecializationParams {
    /// Swap location 1 / index 0 to location 0 / index 1
    pub dual_src_blend: bool,
    /// Bit `n` set = input location `n` is never written by the previous stage
    pub undefined_inputs: u32,
}

/// Produce a specialized copy of `template`
///
/// # Errors
///
/// Returns `PatchFailed` if a binding id below `MAX_NUM_RESOURCE_SLOTS` has
/// no entry in `bindings`, or if an access chain reaches deeper than the type
/// of the input it dereferences.
pub fn specialize(
    template: &SpirvCodeBuffer,
    annotations: &ShaderAnnotations,
    bindings: &dyn BindingMap,
    params: SpecializationParams,
) -> Result<SpirvCodeBuffer> {
    let mut code = template.clone();

    for offset in annotations.id_offsets() {
        let slot = code.word(offset);
        if slot < MAX_NUM_RESOURCE_SLOTS {
            let binding = bindings.binding_id(slot).ok_or_else(|| {
                Error::PatchFailed(format!("resource slot {} has no binding", slot))
            })?;
            code.set_word(offset, binding);
        }
    }

    if params.dual_src_blend {
        let location = annotations.offset_of(MarkerKind::OutputLocation1);
        let index = annotations.offset_of(MarkerKind::OutputIndex1);
        if let (Some(location), Some(index)) = (location, index) {
            let l = code.word(location);
            let i = code.word(index);
            code.set_word(location, i);
            code.set_word(index, l);
        }
    }

    let mut remaining = params.undefined_inputs;
    while remaining != 0 {
        let location = remaining.trailing_zeros();
        eliminate_input_in_place(&mut code, location)?;
        remaining &= remaining - 1;
    }

    Ok(code)
}

/// Replace the `Input` variable at `location` with a zero-initialized `Private` one
///
/// Returns `Ok(false)` without touching `code` if no such input exists or its
/// type is not one of the recorded scalar/vector/array shapes.
///
/// # Errors
///
/// Returns `PatchFailed` if an access chain indexes deeper than the
/// variable's type. `code` is left unchanged in that case.
pub fn eliminate_input(code: &mut SpirvCodeBuffer, location: u32) -> Result<bool> {
    let mut patched = code.clone();
    let eliminated = eliminate_input_in_place(&mut patched, location)?;
    if eliminated {
        *code = patched;
    }
    Ok(eliminated)
}

/// `eliminate_input` without the rollback; `code` is garbage on error
fn eliminate_input_in_place(code: &mut SpirvCodeBuffer, location: u32) -> Result<bool> {
    let (types, var) = TypeGraph::scan_for_input(code, location);
    let Some(var) = var else {
        return Ok(false);
    };

    let Some(pointer) = types.get(var.type_id) else {
        return Ok(false);
    };
    if pointer.kind != TypeKind::Pointer {
        return Ok(false);
    }

    let chain = types.private_chain(pointer.base, || code.alloc_id());
    if chain.is_empty() {
        return Ok(false);
    }

    // Everything that must precede the new variable declaration
    let mut decls = SpirvCodeBuffer::fragment();
    for link in chain.iter().filter(|l| l.declare) {
        decls.put_ins(spv::Op::TypePointer, 4);
        decls.put_word(link.pointer);
        decls.put_word(spv::StorageClass::Private as u32);
        decls.put_word(link.pointee);
    }

    let initializer = define_zero_constants(code, &chain, &mut decls);

    decls.put_ins(spv::Op::Variable, 5);
    decls.put_word(chain[0].pointer);
    decls.put_word(var.id);
    decls.put_word(spv::StorageClass::Private as u32);
    decls.put_word(initializer);

    code.erase(var.offset, var.offset + 4);
    code.insert(var.offset, &decls);

    remove_from_interfaces(code, var.id);
    remove_location(code, var.id);
    retarget_access_chains(code, &chain, &var)?;

    Ok(true)
}

/// Zero constant for the innermost level, then one composite per outer level.
/// Returns the id of the outermost constant.
fn define_zero_constants(
    code: &mut SpirvCodeBuffer,
    chain: &[ChainLink],
    decls: &mut SpirvCodeBuffer,
) -> u32 {
    let mut constant = 0;

    for (i, link) in chain.iter().rev().enumerate() {
        let id = code.alloc_id();
        if i == 0 {
            decls.put_ins(spv::Op::Constant, 4);
            decls.put_word(link.pointee);
            decls.put_word(id);
            decls.put_word(0);
        } else {
            decls.put_ins(spv::Op::ConstantComposite, 3 + link.size);
            decls.put_word(link.pointee);
            decls.put_word(id);
            for _ in 0..link.size {
                decls.put_word(constant);
            }
        }
        constant = id;
    }

    constant
}

/// Drop `id` from the interface list of every entry point
fn remove_from_interfaces(code: &mut SpirvCodeBuffer, id: u32) {
    let mut edits: Vec<(usize, usize, usize)> = Vec::new();

    for ins in code.instructions() {
        if !ins.is(spv::Op::EntryPoint) {
            continue;
        }
        // Interface ids follow the literal name at word 3
        let first = 3 + ins.string_words(3);
        if let Some(arg) = (first..ins.len()).find(|&arg| ins.arg(arg) == id) {
            edits.push((ins.offset(), arg, ins.len()));
        }
    }

    // Back to front so earlier offsets stay valid
    for &(offset, arg, len) in edits.iter().rev() {
        code.set_ins_length(offset, (len - 1) as u32);
        code.erase(offset + arg, offset + arg + 1);
    }
}

/// Erase the `Location` decoration of `id`
fn remove_location(code: &mut SpirvCodeBuffer, id: u32) {
    let decoration = code.instructions().find(|ins| {
        ins.is(spv::Op::Decorate)
            && ins.arg(1) == id
            && ins.arg(2) == spv::Decoration::Location as u32
    });

    if let Some(ins) = decoration {
        let (begin, end) = (ins.offset(), ins.offset() + ins.len());
        code.erase(begin, end);
    }
}

/// Point every access chain rooted at the replaced variable at the private
/// pointer type of matching depth
fn retarget_access_chains(
    code: &mut SpirvCodeBuffer,
    chain: &[ChainLink],
    var: &InputVariable,
) -> Result<()> {
    // (offset, result id, base id, index count)
    let access_chains: Vec<(usize, u32, u32, usize)> = code
        .instructions()
        .filter(|ins| ins.is(spv::Op::AccessChain) || ins.is(spv::Op::InBoundsAccessChain))
        .map(|ins| (ins.offset(), ins.arg(2), ins.arg(3), ins.len() - 4))
        .collect();

    let mut depths: rustc_hash::FxHashMap<u32, usize> = rustc_hash::FxHashMap::default();

    for (offset, result, base, indices) in access_chains {
        let depth = if base == var.id {
            indices
        } else if let Some(&base_depth) = depths.get(&base) {
            base_depth + indices
        } else {
            continue;
        };

        let link = chain.get(depth).ok_or_else(|| {
            Error::PatchFailed(format!(
                "access chain %{} reaches depth {} of input %{}, whose type has {} levels",
                result,
                depth,
                var.id,
                chain.len()
            ))
        })?;

        code.set_word(offset + 1, link.pointer);
        depths.insert(result, depth);
    }

    Ok(())
}

#[cfg(test)]
#[path = "patcher_tests.rs"]
mod tests;
