use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

/// A yes/no question for the user. The shell answers `true` to go ahead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmRequest {
    pub message: String,
}

impl Operation for ConfirmRequest {
    type Output = bool;
}

pub struct Confirm<Ev> {
    context: CapabilityContext<ConfirmRequest, Ev>,
}

impl<Ev> Capability<Ev> for Confirm<Ev> {
    type Operation = ConfirmRequest;
    type MappedSelf<MappedEv> = Confirm<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Confirm::new(self.context.map_event(f))
    }
}

impl<Ev> Confirm<Ev>
where
    Ev: Send + 'static,
{
    pub fn new(context: CapabilityContext<ConfirmRequest, Ev>) -> Self {
        Self { context }
    }

    pub fn ask<F>(&self, message: impl Into<String>, callback: F)
    where
        F: FnOnce(bool) -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        let request = ConfirmRequest {
            message: message.into(),
        };
        self.context.spawn(async move {
            let answer = ctx.request_from_shell(request).await;
            ctx.update_app(callback(answer));
        });
    }
}
