use embedded_hal::delay::DelayNs;
use ufmt::{uwriteln, uWrite};

use super::FilamentPath;
use crate::{Clock, Error, Operator, PathSensors, Stepper};

impl<S, P, T, O> FilamentPath<S, P, T, O>
where
    S: Stepper,
    P: PathSensors,
    T: Clock + DelayNs,
    O: Operator,
{
    /// Hands a fault the controller cannot fix to the operator.
    ///
    /// Reports the fault and the sensors, releases the filament and the
    /// selector, then blocks until the operator acknowledges. Afterwards the
    /// idler returns to where it was and the selector driver to its previous
    /// state. There is no timeout.
    pub fn operator_intervention(&mut self, fault: Error) {
        let _ = self.operator.write_str("\n");
        error!(self.operator, "{}", fault);
        info!(self.operator, "Clear the problem, then hit any key to continue.");
        self.report_sensors();

        let idler = self.idler.slot();
        let selector_enabled = self.selector.is_enabled();
        if let Err(error) = self.park_idler() {
            error!(self.operator, "{}", error);
        }
        self.selector.set_enabled(false);

        self.operator.wait_for_acknowledgement();

        self.selector.set_enabled(selector_enabled);
        if let Err(error) = self.move_idler(idler) {
            error!(self.operator, "{}", error);
        }
        self.clock.delay_ms(1);
    }

    /// Writes the two filament sensors as a small table.
    pub(super) fn report_sensors(&mut self) {
        let snapshot = self.sensors.snapshot();
        let _ = uwriteln!(self.operator, "SELECTOR | PRINTHEAD");
        let _ = uwriteln!(
            self.operator,
            "{}      | {}",
            on_off(snapshot.selector_presence),
            on_off(snapshot.extruder_presence)
        );
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "ON "
    } else {
        "OFF"
    }
}
