use std::fmt;

use thiserror::Error;

/// Whether a port feeds data into the model or carries a result out of it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Input => "input",
            Direction::Output => "output",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Element type of the tensor flowing through a port.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DType {
    F32,
    F64,
    F16,
    BF16,
    I32,
    I64,
    U8,
}

impl DType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DType::F32 => "f32",
            DType::F64 => "f64",
            DType::F16 => "f16",
            DType::BF16 => "bf16",
            DType::I32 => "i32",
            DType::I64 => "i64",
            DType::U8 => "u8",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by the port query surface.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PortError {
    #[error("model has no {0} ports")]
    NoPorts(Direction),

    #[error("model has {count} {direction} ports, select one by name or index")]
    Ambiguous { direction: Direction, count: usize },

    #[error("model has no {direction} port named \"{name}\"")]
    UnknownName { direction: Direction, name: String },

    #[error("{direction} port index {index} is out of range, model has {len} {direction} ports")]
    OutOfRange {
        direction: Direction,
        index: i32,
        len: usize,
    },
}

/// One connection point of a model together with its tensor metadata.
///
/// Direction and position index are assigned when the port is attached to a
/// [`Model`]; two ports compare equal when all of their metadata matches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Port {
    direction: Direction,
    index: usize,
    name: String,
    shape: Vec<usize>,
    dtype: DType,
}

impl Port {
    pub fn new(name: impl Into<String>, shape: Vec<usize>, dtype: DType) -> Self {
        Self {
            direction: Direction::Input,
            index: 0,
            name: name.into(),
            shape,
            dtype,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }
}

/// An immutable computational-graph handle with a name and ordered ports.
pub struct Model {
    name: String,
    inputs: Vec<Port>,
    outputs: Vec<Port>,
}

impl Model {
    /// Build a model from its port lists. Each port is renumbered so that
    /// direction and index always reflect its position in the list.
    pub fn new(name: impl Into<String>, mut inputs: Vec<Port>, mut outputs: Vec<Port>) -> Self {
        for (i, port) in inputs.iter_mut().enumerate() {
            port.direction = Direction::Input;
            port.index = i;
        }
        for (i, port) in outputs.iter_mut().enumerate() {
            port.direction = Direction::Output;
            port.index = i;
        }
        Self {
            name: name.into(),
            inputs,
            outputs,
        }
    }

    /// Name reported by the engine. Empty when the model was never given one.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The sole input port. Fails when the model has no inputs or the choice
    /// is ambiguous.
    pub fn input(&self) -> Result<&Port, PortError> {
        sole_port(&self.inputs, Direction::Input)
    }

    pub fn input_by_name(&self, name: &str) -> Result<&Port, PortError> {
        port_by_name(&self.inputs, Direction::Input, name)
    }

    pub fn input_by_index(&self, index: i32) -> Result<&Port, PortError> {
        port_by_index(&self.inputs, Direction::Input, index)
    }

    /// All input ports in declaration order.
    pub fn inputs(&self) -> &[Port] {
        &self.inputs
    }

    /// The sole output port. Fails when the model has no outputs or the
    /// choice is ambiguous.
    pub fn output(&self) -> Result<&Port, PortError> {
        sole_port(&self.outputs, Direction::Output)
    }

    pub fn output_by_name(&self, name: &str) -> Result<&Port, PortError> {
        port_by_name(&self.outputs, Direction::Output, name)
    }

    pub fn output_by_index(&self, index: i32) -> Result<&Port, PortError> {
        port_by_index(&self.outputs, Direction::Output, index)
    }

    /// All output ports in declaration order.
    pub fn outputs(&self) -> &[Port] {
        &self.outputs
    }
}

fn sole_port(ports: &[Port], direction: Direction) -> Result<&Port, PortError> {
    match ports {
        [port] => Ok(port),
        [] => Err(PortError::NoPorts(direction)),
        _ => Err(PortError::Ambiguous {
            direction,
            count: ports.len(),
        }),
    }
}

fn port_by_name<'a>(ports: &'a [Port], direction: Direction, name: &str) -> Result<&'a Port, PortError> {
    ports
        .iter()
        .find(|port| port.name == name)
        .ok_or_else(|| PortError::UnknownName {
            direction,
            name: name.to_string(),
        })
}

fn port_by_index(ports: &[Port], direction: Direction, index: i32) -> Result<&Port, PortError> {
    usize::try_from(index)
        .ok()
        .and_then(|i| ports.get(i))
        .ok_or(PortError::OutOfRange {
            direction,
            index,
            len: ports.len(),
        })
}
