//! Preset execution.
//!
//! Presets run immediately and report one outcome per device touched.
//! A step whose device is not registered is reported as skipped and the
//! preset carries on. So is a brightness step on a device that cannot dim.

use intentcp_domain::action::Action;
use intentcp_domain::device::DeviceDescriptor;
use intentcp_domain::error::{IntentError, ValidationError};
use intentcp_domain::outcome::{DispatchOutcome, DispatchReason, PresetReport};
use intentcp_domain::preset::{Preset, PresetTarget};

use super::dispatch_service::DispatchService;
use crate::ports::{BackendClient, DeviceRegistry};

impl<R, B> DispatchService<R, B>
where
    R: DeviceRegistry + Send + Sync + 'static,
    B: BackendClient + Send + Sync + 'static,
{
    /// Run the named preset.
    ///
    /// # Errors
    ///
    /// Returns [`IntentError::Validation`] if `name` is not a known preset.
    /// Per-step failures are reported in the returned [`PresetReport`].
    #[tracing::instrument(skip(self))]
    pub async fn run_preset(&self, name: &str) -> Result<PresetReport, IntentError> {
        let preset: Preset = name.parse()?;
        let mut outcomes = Vec::new();

        for step in preset.steps() {
            let devices = match step.target {
                PresetTarget::Device(device) => {
                    vec![(device.to_string(), self.executor.registry.lookup(device).await)]
                }
                PresetTarget::AllDevices => self
                    .executor
                    .registry
                    .list()
                    .await
                    .into_iter()
                    .map(|(name, descriptor)| (name, Some(descriptor)))
                    .collect(),
            };

            for (device, descriptor) in devices {
                let outcome = match descriptor {
                    None => DispatchOutcome::unknown_device(&device, &step.action),
                    Some(descriptor) if !accepts(&descriptor, &step.action) => {
                        DispatchOutcome::skipped(
                            &device,
                            &step.action,
                            DispatchReason::UnsupportedAction,
                            ValidationError::BrightnessUnsupported.to_string(),
                        )
                    }
                    Some(descriptor) => self
                        .executor
                        .run(&device, &descriptor, &step.action, Some(step.code))
                        .await
                        .unwrap_or_else(|err| {
                            DispatchOutcome::failed(
                                &device,
                                &step.action,
                                DispatchReason::from(&err),
                                err.detail(),
                            )
                        }),
                };
                outcomes.push(outcome);
            }
        }

        let failed = outcomes.iter().filter(|o| !o.ok).count();
        tracing::info!(preset = preset.name(), steps = outcomes.len(), failed, "preset finished");
        Ok(PresetReport {
            sequence: preset.name(),
            steps: outcomes,
        })
    }
}

/// Brightness steps need a dimmable device with a primary target.
fn accepts(descriptor: &DeviceDescriptor, action: &Action) -> bool {
    match action {
        Action::Brightness(_) => {
            descriptor.supports_brightness && descriptor.primary_target_id.is_some()
        }
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use crate::services::dispatch_service::tests::make_service;
    use intentcp_domain::device::{DeviceDescriptor, DeviceKind};
    use intentcp_domain::error::{IntentError, ValidationError};
    use intentcp_domain::outcome::DispatchReason;
    use serde_json::json;

    #[tokio::test]
    async fn should_turn_off_main_lights_and_skip_missing_ones_for_movie() {
        let (svc, _, backend) = make_service();
        let report = svc.run_preset("movie").await.unwrap();

        assert_eq!(report.sequence, "movie");
        assert_eq!(report.steps.len(), 2);
        assert!(report.steps[0].ok);
        assert_eq!(report.steps[1].device, "subdesk_light");
        assert!(report.steps[1].skipped);
        assert_eq!(
            backend.calls(),
            vec![("t-bed".to_string(), "switch_led".to_string(), json!(false))]
        );
    }

    #[tokio::test]
    async fn should_switch_off_every_registered_device_for_sleep() {
        let (svc, _, backend) = make_service();
        let report = svc.run_preset("sleep").await.unwrap();

        let devices: Vec<_> = report.steps.iter().map(|o| o.device.as_str()).collect();
        assert_eq!(devices, vec!["bed_light", "door", "lamp"]);
        let targets: Vec<_> = backend.calls().into_iter().map(|c| c.0).collect();
        assert_eq!(targets, vec!["t-bed", "t-door-close", "t-lamp"]);
        assert!(backend.calls().iter().all(|c| c.1 == "switch_led"));
    }

    #[tokio::test]
    async fn should_switch_on_then_dim_bed_light_for_mood() {
        let (svc, _, backend) = make_service();
        let report = svc.run_preset("mood").await.unwrap();

        assert!(report.steps.iter().all(|o| o.ok));
        assert_eq!(
            backend.calls(),
            vec![
                ("t-bed".to_string(), "switch_led".to_string(), json!(true)),
                ("t-bed".to_string(), "bright_value_v2".to_string(), json!(40)),
            ]
        );
    }

    #[tokio::test]
    async fn should_skip_mood_dimming_when_bed_light_cannot_dim() {
        let (svc, registry, backend) = make_service();
        registry.replace([(
            "bed_light".to_string(),
            DeviceDescriptor::builder(DeviceKind::Light)
                .primary_target("t-bed")
                .build()
                .unwrap(),
        )]);

        let report = svc.run_preset("mood").await.unwrap();

        assert!(report.steps[0].ok);
        assert!(report.steps[1].skipped);
        assert!(!report.steps[1].ok);
        assert_eq!(report.steps[1].action, "brightness");
        assert_eq!(report.steps[1].reason, DispatchReason::UnsupportedAction);
        assert_eq!(
            backend.calls(),
            vec![("t-bed".to_string(), "switch_led".to_string(), json!(true))]
        );
    }

    #[tokio::test]
    async fn should_report_transport_failures_per_step() {
        let (svc, _, backend) = make_service();
        *backend.offline.lock().unwrap() = true;
        let report = svc.run_preset("mood").await.unwrap();

        assert_eq!(report.steps.len(), 2);
        assert!(
            report
                .steps
                .iter()
                .all(|o| o.reason == DispatchReason::TransportError)
        );
    }

    #[tokio::test]
    async fn should_reject_unknown_preset() {
        let (svc, _, backend) = make_service();
        let result = svc.run_preset("party").await;
        assert!(matches!(
            result,
            Err(IntentError::Validation(ValidationError::UnknownPreset(name))) if name == "party"
        ));
        assert!(backend.calls().is_empty());
    }
}
