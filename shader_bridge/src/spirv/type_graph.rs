/// TypeGraph - id-keyed view of the scalar/vector/array/pointer declarations of a module

use rustc_hash::FxHashMap;
use spirv as spv;

use crate::spirv::code_buffer::SpirvCodeBuffer;

/// Kind of a recorded type declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// `OpTypeInt` / `OpTypeFloat`; `size` is the bit width
    Scalar,
    /// `OpTypeVector`; `size` is the component count
    Vector,
    /// `OpTypeArray` with a known constant length; `size` is the length
    Array,
    /// `OpTypePointer`; `storage` is the storage class
    Pointer,
}

/// One type declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeNode {
    pub kind: TypeKind,
    /// Element, component or pointee type id (0 for scalars)
    pub base: u32,
    pub size: u32,
    /// Raw storage class, pointers only
    pub storage: Option<u32>,
}

impl TypeNode {
    pub fn scalar(width: u32) -> Self {
        Self {
            kind: TypeKind::Scalar,
            base: 0,
            size: width,
            storage: None,
        }
    }

    pub fn vector(component: u32, count: u32) -> Self {
        Self {
            kind: TypeKind::Vector,
            base: component,
            size: count,
            storage: None,
        }
    }

    pub fn array(element: u32, length: u32) -> Self {
        Self {
            kind: TypeKind::Array,
            base: element,
            size: length,
            storage: None,
        }
    }

    pub fn pointer(pointee: u32, storage: spv::StorageClass) -> Self {
        Self::pointer_raw(pointee, storage as u32)
    }

    pub fn pointer_raw(pointee: u32, storage: u32) -> Self {
        Self {
            kind: TypeKind::Pointer,
            base: pointee,
            size: 0,
            storage: Some(storage),
        }
    }
}

/// Input variable located by `TypeGraph::scan_for_input`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputVariable {
    /// Word offset of the `OpVariable`
    pub offset: usize,
    /// Pointer type id
    pub type_id: u32,
    pub id: u32,
}

/// One level of a private pointer chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainLink {
    /// Private pointer type id (existing or freshly allocated)
    pub pointer: u32,
    /// Pointee type id
    pub pointee: u32,
    /// Kind of the pointee
    pub kind: TypeKind,
    /// Pointee size (component count, array length or bit width)
    pub size: u32,
    /// Whether `pointer` still needs an `OpTypePointer` declaration
    pub declare: bool,
}

/// Type declarations recorded in declaration order
#[derive(Debug, Clone, Default)]
pub struct TypeGraph {
    nodes: FxHashMap<u32, TypeNode>,
    order: Vec<u32>,
}

impl TypeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single pass over `code` up to the `Input` variable decorated with
    /// `Location == location`, recording every type declared before it
    pub fn scan_for_input(code: &SpirvCodeBuffer, location: u32) -> (Self, Option<InputVariable>) {
        let mut graph = Self::new();
        let mut constants: FxHashMap<u32, u32> = FxHashMap::default();
        let mut candidates: Vec<u32> = Vec::new();

        for ins in code {
            let op = ins.opcode();

            if op == spv::Op::Decorate as u32 {
                if ins.arg(2) == spv::Decoration::Location as u32 && ins.arg(3) == location {
                    candidates.push(ins.arg(1));
                }
            } else if op == spv::Op::Constant as u32 {
                constants.insert(ins.arg(2), ins.arg(3));
            } else if op == spv::Op::TypeFloat as u32 || op == spv::Op::TypeInt as u32 {
                graph.insert(ins.arg(1), TypeNode::scalar(ins.arg(2)));
            } else if op == spv::Op::TypeVector as u32 {
                graph.insert(ins.arg(1), TypeNode::vector(ins.arg(2), ins.arg(3)));
            } else if op == spv::Op::TypeArray as u32 {
                if let Some(&length) = constants.get(&ins.arg(3)) {
                    graph.insert(ins.arg(1), TypeNode::array(ins.arg(2), length));
                }
            } else if op == spv::Op::TypePointer as u32 {
                graph.insert(ins.arg(1), TypeNode::pointer_raw(ins.arg(3), ins.arg(2)));
            } else if op == spv::Op::Variable as u32
                && ins.arg(3) == spv::StorageClass::Input as u32
                && candidates.contains(&ins.arg(2))
            {
                let var = InputVariable {
                    offset: ins.offset(),
                    type_id: ins.arg(1),
                    id: ins.arg(2),
                };
                return (graph, Some(var));
            }
        }

        (graph, None)
    }

    pub fn insert(&mut self, id: u32, node: TypeNode) {
        if self.nodes.insert(id, node).is_none() {
            self.order.push(id);
        }
    }

    pub fn get(&self, id: u32) -> Option<&TypeNode> {
        self.nodes.get(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Id of the first declared pointer to `pointee` in `storage`
    pub fn find_pointer(&self, pointee: u32, storage: spv::StorageClass) -> Option<u32> {
        self.order.iter().copied().find(|id| {
            let node = &self.nodes[id];
            node.kind == TypeKind::Pointer
                && node.base == pointee
                && node.storage == Some(storage as u32)
        })
    }

    /// Build the private pointer chain for `root`, outermost first
    ///
    /// Each level points at `root`, then at its element type, and so on down
    /// to the first id the graph does not know. Pointers missing from the
    /// module get a fresh id from `alloc_id` and are flagged for declaration.
    pub fn private_chain(&self, root: u32, mut alloc_id: impl FnMut() -> u32) -> Vec<ChainLink> {
        let mut chain = Vec::new();
        let mut current = root;

        // Bounded by the node count so a malformed cycle cannot spin forever
        while let Some(node) = self.nodes.get(&current) {
            if chain.len() >= self.nodes.len() {
                break;
            }

            let (pointer, declare) = match self.find_pointer(current, spv::StorageClass::Private) {
                Some(existing) => (existing, false),
                None => (alloc_id(), true),
            };

            chain.push(ChainLink {
                pointer,
                pointee: current,
                kind: node.kind,
                size: node.size,
                declare,
            });

            current = node.base;
        }

        chain
    }
}

#[cfg(test)]
#[path = "type_graph_tests.rs"]
mod tests;
