//! Human-readable dump of a whole device.
//!
//! The format is meant for eyeballing a model while writing it. It is
//! deterministic (everything is printed in declaration order) but not stable
//! and not meant to be parsed.

use std::fmt::{Display, Formatter};

use crate::device::Device;

/// Display adapter returned by [`Device::dump`].
pub struct DeviceDump<'a> {
    device: &'a Device,
}

impl Device {
    pub fn dump(&self) -> DeviceDump<'_> {
        DeviceDump { device: self }
    }
}

impl Display for DeviceDump<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let d = self.device;

        writeln!(f, "device {} {{", d.name())?;

        writeln!(f, "types:")?;
        for fsm in d.fsms() {
            writeln!(f, "\tfsm {} {{", d.fsm_name(fsm))?;
            for state in d.states(fsm) {
                writeln!(f, "\t\tstate {}", d.state_name(state))?;
            }
            writeln!(f, "\t}}")?;
        }

        writeln!(f, "vars:")?;
        for var in d.vars() {
            writeln!(
                f,
                "\tvar {} {} = {}",
                d.var_name(var),
                d.fsm_canonical_name(d.var_type(var)),
                d.state_canonical_name(d.var_initial(var)),
            )?;
        }

        writeln!(f, "msgs:")?;
        for msg in d.messages() {
            writeln!(f, "\tmessage {} {{", d.message_name(msg))?;
            if let Some(pre) = d.precondition(msg) {
                writeln!(f, "\t\tprecondition: {}", d.describe(pre))?;
            }
            writeln!(f, "\t\tassign {{")?;
            for (var, state) in d.assignments(msg) {
                writeln!(f, "\t\t\t{} << {}", d.var_name(var), d.state_name(state))?;
            }
            writeln!(f, "\t\t}}")?;
            writeln!(f, "\t}}")?;
        }

        writeln!(f, "}}")
    }
}
