use serde::Serialize;

use super::{GlobalMemoryElement, MemoryTracker, StackMemoryElement, UserDefinedType};

/**
 The stack elements of one function, in the order in which the scopes of the
 function were closed.  Every element carries the offset it had from the top
 of the stack when its scope was closed.
 */
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FunctionFrame {
    pub function: String,
    pub elements: Vec<StackMemoryElement>,
}

impl FunctionFrame {
    pub fn new(function: &str) -> FunctionFrame {
        FunctionFrame {
            function: function.into(),
            elements: vec![],
        }
    }

    /// The number of bytes the function needs when all of its scopes are open
    /// at the same time, which is an upper bound on its stack usage.
    pub fn size(&self) -> usize {
        self.elements
            .iter()
            .fold(0, |total: usize, e| total.saturating_add(e.element.size))
    }
}

/// The memory layout of a single verified file.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FileLayout {
    pub file_id: String,
    pub udts: Vec<UserDefinedType>,
    pub frames: Vec<FunctionFrame>,
}

/// Everything the code generator needs to address the storage of a program:
/// the final data segment and the stack frame of every function.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ProgramLayout {
    pub data_segment: Vec<GlobalMemoryElement>,
    pub data_segment_size: usize,
    pub files: Vec<FileLayout>,
}

impl ProgramLayout {
    pub fn new(memory: &MemoryTracker, files: Vec<FileLayout>) -> ProgramLayout {
        ProgramLayout {
            data_segment: memory.data_segment(),
            data_segment_size: memory.data_segment_size(),
            files,
        }
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
