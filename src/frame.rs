use std::collections::HashMap;

use util::EnumFromStr;
use util_derive::EnumFromStr;

use crate::error::{Error, Result};
use crate::value::Value;

/// Which of the three named frames a `var` argument refers to.
#[derive(Clone, Copy, PartialEq, Eq, Debug, EnumFromStr)]
#[allow(clippy::upper_case_acronyms)]
pub enum FrameId {
    GF,
    LF,
    TF,
}

impl FrameId {
    fn label(self) -> &'static str {
        match self {
            FrameId::GF => "GF",
            FrameId::LF => "LF",
            FrameId::TF => "TF",
        }
    }
}

/// A variable slot: either never assigned, or holding a concrete value.
#[derive(Clone, Debug, PartialEq)]
enum Slot {
    Uninit,
    Value(Value),
}

/// A single named frame: a flat map from variable name to slot.
#[derive(Clone, Debug, Default)]
pub struct Frame {
    slots: HashMap<String, Slot>,
}

impl Frame {
    fn new() -> Frame {
        Frame { slots: HashMap::new() }
    }
}

/// Owns the global frame, the optional temporary frame and the stack of
/// local frames, and implements the frame-lifecycle operations.
#[derive(Default)]
pub struct FrameStore {
    global: Frame,
    temporary: Option<Frame>,
    locals: Vec<Frame>,
}

impl FrameStore {
    pub fn new() -> FrameStore {
        FrameStore {
            global: Frame::new(),
            temporary: None,
            locals: Vec::new(),
        }
    }

    fn frame(&self, id: FrameId) -> Result<&Frame> {
        match id {
            FrameId::GF => Ok(&self.global),
            FrameId::TF => self.temporary.as_ref().ok_or(Error::UndefinedFrame("TF")),
            FrameId::LF => self.locals.last().ok_or(Error::UndefinedFrame("LF")),
        }
    }

    fn frame_mut(&mut self, id: FrameId) -> Result<&mut Frame> {
        match id {
            FrameId::GF => Ok(&mut self.global),
            FrameId::TF => self.temporary.as_mut().ok_or(Error::UndefinedFrame("TF")),
            FrameId::LF => self.locals.last_mut().ok_or(Error::UndefinedFrame("LF")),
        }
    }

    /// `DEFVAR F@n`: creates an uninitialized slot; errors if it already exists.
    pub fn defvar(&mut self, id: FrameId, name: &str) -> Result<()> {
        let frame = self.frame_mut(id)?;
        if frame.slots.contains_key(name) {
            return Err(Error::VariableRedefinition(format!("{}@{}", id.label(), name)));
        }
        frame.slots.insert(name.to_owned(), Slot::Uninit);
        Ok(())
    }

    /// Reads the value stored at `F@n`. Errors if the variable does not
    /// exist, or if it exists but was never assigned.
    pub fn get(&self, id: FrameId, name: &str) -> Result<Value> {
        let frame = self.frame(id)?;
        match frame.slots.get(name) {
            None => Err(Error::UndefinedVariable(format!("{}@{}", id.label(), name))),
            Some(Slot::Uninit) => Err(Error::UninitializedValue),
            Some(Slot::Value(v)) => Ok(v.clone()),
        }
    }

    /// Like [`get`](Self::get), but an uninitialized variable yields `None`
    /// instead of an error — used only by `TYPE`, the one instruction the
    /// spec exempts from the "reading an uninitialized value is an error" rule.
    pub fn get_for_type(&self, id: FrameId, name: &str) -> Result<Option<Value>> {
        let frame = self.frame(id)?;
        match frame.slots.get(name) {
            None => Err(Error::UndefinedVariable(format!("{}@{}", id.label(), name))),
            Some(Slot::Uninit) => Ok(None),
            Some(Slot::Value(v)) => Ok(Some(v.clone())),
        }
    }

    /// Assigns `value` to the existing slot `F@n`. Errors if the variable
    /// does not exist (it must have been `DEFVAR`-ed first).
    pub fn set(&mut self, id: FrameId, name: &str, value: Value) -> Result<()> {
        let frame = self.frame_mut(id)?;
        match frame.slots.get_mut(name) {
            None => Err(Error::UndefinedVariable(format!("{}@{}", id.label(), name))),
            Some(slot) => {
                *slot = Slot::Value(value);
                Ok(())
            }
        }
    }

    /// `CREATEFRAME`: replaces any existing TF with a fresh empty one.
    pub fn create_frame(&mut self) {
        self.temporary = Some(Frame::new());
    }

    /// `PUSHFRAME`: moves TF onto the top of the LF stack.
    pub fn push_frame(&mut self) -> Result<()> {
        let frame = self.temporary.take().ok_or(Error::UndefinedFrame("TF"))?;
        self.locals.push(frame);
        Ok(())
    }

    /// `POPFRAME`: moves the top LF to TF, replacing any prior TF.
    pub fn pop_frame(&mut self) -> Result<()> {
        let frame = self.locals.pop().ok_or(Error::UndefinedFrame("LF"))?;
        self.temporary = Some(frame);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defvar_then_read_uninit_is_error() {
        let mut store = FrameStore::new();
        store.defvar(FrameId::GF, "x").unwrap();
        assert_eq!(store.get(FrameId::GF, "x"), Err(Error::UninitializedValue));
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut store = FrameStore::new();
        store.defvar(FrameId::GF, "x").unwrap();
        store.set(FrameId::GF, "x", Value::Int(42)).unwrap();
        assert_eq!(store.get(FrameId::GF, "x"), Ok(Value::Int(42)));
    }

    #[test]
    fn redefinition_is_error() {
        let mut store = FrameStore::new();
        store.defvar(FrameId::GF, "x").unwrap();
        assert!(matches!(store.defvar(FrameId::GF, "x"), Err(Error::VariableRedefinition(_))));
    }

    #[test]
    fn tf_missing_until_createframe() {
        let mut store = FrameStore::new();
        assert_eq!(store.defvar(FrameId::TF, "a"), Err(Error::UndefinedFrame("TF")));
        store.create_frame();
        store.defvar(FrameId::TF, "a").unwrap();
    }

    #[test]
    fn frame_lifecycle_roundtrip() {
        // CREATEFRAME; DEFVAR TF@x; PUSHFRAME; POPFRAME -> TF@x reachable again.
        let mut store = FrameStore::new();
        store.create_frame();
        store.defvar(FrameId::TF, "x").unwrap();
        store.set(FrameId::TF, "x", Value::Int(1)).unwrap();
        store.push_frame().unwrap();
        assert_eq!(store.defvar(FrameId::TF, "x"), Err(Error::UndefinedFrame("TF")));
        store.pop_frame().unwrap();
        assert_eq!(store.get(FrameId::TF, "x"), Ok(Value::Int(1)));
    }

    #[test]
    fn popframe_on_empty_locals_is_undefined_frame() {
        let mut store = FrameStore::new();
        assert_eq!(store.pop_frame(), Err(Error::UndefinedFrame("LF")));
    }

    #[test]
    fn lf_push_shadows_redefinition_check() {
        // CREATEFRAME; DEFVAR TF@a; MOVE TF@a int@1; PUSHFRAME; DEFVAR LF@a
        // must raise VariableRedefinition, because LF@a now refers to the
        // pushed frame which already contains "a".
        let mut store = FrameStore::new();
        store.create_frame();
        store.defvar(FrameId::TF, "a").unwrap();
        store.set(FrameId::TF, "a", Value::Int(1)).unwrap();
        store.push_frame().unwrap();
        assert!(matches!(store.defvar(FrameId::LF, "a"), Err(Error::VariableRedefinition(_))));
    }
}
