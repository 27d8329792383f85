//! Hands out the parameters and locals of the function being analyzed.

use std::collections::HashMap;

use crate::gcode::{ReturnType, VarId, VarKind, VarTable};

/// Tracks every variable of one function. Reset between functions.
///
/// Parameters are keyed by how deep in the caller's stack they were found, so two
/// branches that both reach below their base share the same parameter.
#[derive(Debug, Default)]
pub struct VarManager {
    table: VarTable,
    params: HashMap<usize, VarId>,
}

impl VarManager {
    pub fn new() -> Self {
        VarManager::default()
    }

    /// Forgets every variable, ready for the next function.
    pub fn reset(&mut self) {
        self.table = VarTable::default();
        self.params.clear();
    }

    /// The parameter for the caller's stack value at `depth`, allocating it on first use.
    pub fn param(&mut self, depth: usize, ty: ReturnType) -> VarId {
        let table = &mut self.table;
        *self.params.entry(depth).or_insert_with(|| table.push(VarKind::Parameter { depth }, ty))
    }

    pub fn local(&mut self, ty: ReturnType) -> VarId {
        self.table.push(VarKind::Local, ty)
    }

    pub fn table(&self) -> &VarTable {
        &self.table
    }

    /// Narrows the type of a variable that was not known yet.
    pub fn refine(&mut self, id: VarId, ty: ReturnType) {
        let var = self.table.get_mut(id);
        if var.ty == ReturnType::Generic {
            var.ty = ty;
        }
    }

    /// True while no variable has been allocated since the last reset.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// The parameters in signature order: the deepest caller value comes first.
    pub fn params(&self) -> Vec<VarId> {
        let mut params = self.params.iter().map(|(depth, id)| (*depth, *id)).collect::<Vec<_>>();
        params.sort_by(|a, b| b.0.cmp(&a.0));
        params.into_iter().map(|(_, id)| id).collect()
    }

    /// Names the parameters `p1..pn` in signature order, then the locals `v1..vm` in
    /// allocation order. Always produces the same names for the same function.
    pub fn reassign(&mut self) {
        for (index, id) in self.params().into_iter().enumerate() {
            self.table.get_mut(id).name = Some(format!("p{}", index + 1));
        }

        let mut count = 0;
        for (_, var) in self.table.iter_mut() {
            if var.kind == VarKind::Local {
                count += 1;
                var.name = Some(format!("v{count}"));
            }
        }
    }

    /// Moves the finished table out, leaving the manager reset.
    pub fn take_table(&mut self) -> VarTable {
        self.params.clear();
        std::mem::take(&mut self.table)
    }
}
