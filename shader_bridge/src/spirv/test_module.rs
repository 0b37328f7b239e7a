//! Hand-assembled SPIR-V modules shared by the spirv unit tests

use spirv as spv;

use crate::spirv::code_buffer::SpirvCodeBuffer;

/// Small assembler over `SpirvCodeBuffer`
pub struct ModuleBuilder {
    code: SpirvCodeBuffer,
}

impl ModuleBuilder {
    pub fn new() -> Self {
        Self {
            code: SpirvCodeBuffer::module(1),
        }
    }

    pub fn id(&mut self) -> u32 {
        self.code.alloc_id()
    }

    pub fn ins(&mut self, op: spv::Op, operands: &[u32]) -> &mut Self {
        self.code.put_ins(op, 1 + operands.len() as u32);
        for &w in operands {
            self.code.put_word(w);
        }
        self
    }

    pub fn entry_point(&mut self, model: spv::ExecutionModel, func: u32, name: &str, interface: &[u32]) -> &mut Self {
        let len = 3 + SpirvCodeBuffer::str_len(name) + interface.len() as u32;
        self.code.put_ins(spv::Op::EntryPoint, len);
        self.code.put_word(model as u32);
        self.code.put_word(func);
        self.code.put_str(name);
        for &w in interface {
            self.code.put_word(w);
        }
        self
    }

    pub fn decorate(&mut self, target: u32, decoration: spv::Decoration, literal: u32) -> &mut Self {
        self.ins(spv::Op::Decorate, &[target, decoration as u32, literal])
    }

    pub fn build(self) -> SpirvCodeBuffer {
        self.code
    }
}

/// Ids of interest in `fragment_module`
#[allow(dead_code)]
pub struct FragmentIds {
    pub main: u32,
    pub float: u32,
    pub vec4: u32,
    pub uint: u32,
    pub array: u32,
    pub ptr_in_vec4: u32,
    pub ptr_in_array: u32,
    pub ptr_in_float: u32,
    pub ptr_private_vec4: u32,
    pub in_color: u32,
    pub in_uv: u32,
    pub out0: u32,
    pub out1: u32,
    pub chain_uv: u32,
    pub chain_uv_x: u32,
    pub chain_color_x: u32,
}

/// Fragment shader with two inputs and a dual-source output pair
///
/// ```text
/// in_color : vec4     @ location 0
/// in_uv    : vec4[2]  @ location 2
/// out0     : vec4     @ location 0
/// out1     : vec4     @ location 1, index 0
/// texture binding 5, spec constant id 3, constant buffer binding 2000
/// ```
pub fn fragment_module() -> (SpirvCodeBuffer, FragmentIds) {
    let mut b = ModuleBuilder::new();

    let main = b.id();
    let void = b.id();
    let func_ty = b.id();
    let float = b.id();
    let vec4 = b.id();
    let uint = b.id();
    let c1 = b.id();
    let c2 = b.id();
    let array = b.id();
    let ptr_in_vec4 = b.id();
    let ptr_in_array = b.id();
    let ptr_in_float = b.id();
    let ptr_out_vec4 = b.id();
    let ptr_private_vec4 = b.id();
    let in_color = b.id();
    let in_uv = b.id();
    let out0 = b.id();
    let out1 = b.id();
    let tex = b.id();
    let cbuf = b.id();
    let spec = b.id();
    let label = b.id();
    let chain_uv = b.id();
    let chain_uv_x = b.id();
    let chain_color_x = b.id();
    let load_uv = b.id();
    let load_color = b.id();

    b.ins(spv::Op::Capability, &[spv::Capability::Shader as u32]);
    b.ins(
        spv::Op::MemoryModel,
        &[spv::AddressingModel::Logical as u32, spv::MemoryModel::GLSL450 as u32],
    );
    b.entry_point(spv::ExecutionModel::Fragment, main, "main", &[in_color, in_uv, out0, out1]);
    b.ins(
        spv::Op::ExecutionMode,
        &[main, spv::ExecutionMode::OriginUpperLeft as u32],
    );

    b.decorate(in_color, spv::Decoration::Location, 0);
    b.decorate(in_uv, spv::Decoration::Location, 2);
    b.decorate(out0, spv::Decoration::Location, 0);
    b.decorate(out1, spv::Decoration::Location, 1);
    b.decorate(out1, spv::Decoration::Index, 0);
    b.decorate(tex, spv::Decoration::DescriptorSet, 0);
    b.decorate(tex, spv::Decoration::Binding, 5);
    b.decorate(cbuf, spv::Decoration::Binding, 2000);
    b.decorate(spec, spv::Decoration::SpecId, 3);

    b.ins(spv::Op::TypeVoid, &[void]);
    b.ins(spv::Op::TypeFunction, &[func_ty, void]);
    b.ins(spv::Op::TypeFloat, &[float, 32]);
    b.ins(spv::Op::TypeVector, &[vec4, float, 4]);
    b.ins(spv::Op::TypeInt, &[uint, 32, 0]);
    b.ins(spv::Op::Constant, &[uint, c1, 1]);
    b.ins(spv::Op::Constant, &[uint, c2, 2]);
    b.ins(spv::Op::TypeArray, &[array, vec4, c2]);
    b.ins(spv::Op::TypePointer, &[ptr_in_vec4, spv::StorageClass::Input as u32, vec4]);
    b.ins(spv::Op::TypePointer, &[ptr_in_array, spv::StorageClass::Input as u32, array]);
    b.ins(spv::Op::TypePointer, &[ptr_in_float, spv::StorageClass::Input as u32, float]);
    b.ins(spv::Op::TypePointer, &[ptr_out_vec4, spv::StorageClass::Output as u32, vec4]);
    b.ins(spv::Op::TypePointer, &[ptr_private_vec4, spv::StorageClass::Private as u32, vec4]);

    b.ins(spv::Op::Variable, &[ptr_in_vec4, in_color, spv::StorageClass::Input as u32]);
    b.ins(spv::Op::Variable, &[ptr_in_array, in_uv, spv::StorageClass::Input as u32]);
    b.ins(spv::Op::Variable, &[ptr_out_vec4, out0, spv::StorageClass::Output as u32]);
    b.ins(spv::Op::Variable, &[ptr_out_vec4, out1, spv::StorageClass::Output as u32]);

    b.ins(spv::Op::Function, &[void, main, 0, func_ty]);
    b.ins(spv::Op::Label, &[label]);
    b.ins(spv::Op::AccessChain, &[ptr_in_vec4, chain_uv, in_uv, c1]);
    b.ins(spv::Op::InBoundsAccessChain, &[ptr_in_float, chain_uv_x, chain_uv, c1]);
    b.ins(spv::Op::AccessChain, &[ptr_in_float, chain_color_x, in_color, c1]);
    b.ins(spv::Op::Load, &[float, load_uv, chain_uv_x]);
    b.ins(spv::Op::Load, &[vec4, load_color, in_color]);
    b.ins(spv::Op::Store, &[out0, load_color]);
    b.ins(spv::Op::Return, &[]);
    b.ins(spv::Op::FunctionEnd, &[]);

    let ids = FragmentIds {
        main,
        float,
        vec4,
        uint,
        array,
        ptr_in_vec4,
        ptr_in_array,
        ptr_in_float,
        ptr_private_vec4,
        in_color,
        in_uv,
        out0,
        out1,
        chain_uv,
        chain_uv_x,
        chain_color_x,
    };

    (b.build(), ids)
}
