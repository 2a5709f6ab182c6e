//! Shorthand for the two effect variants reducers build constantly

/// Wraps an async block into an `Effect::Future`
///
/// The block must evaluate to `Option<Action>`; `Some` is fed back.
///
/// ```rust,ignore
/// use cinemadise_core::async_effect;
///
/// async_effect! {
///     let outcome = exporter.export(&receipt).await;
///     Some(ReceiptAction::ExportFinished { outcome })
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

/// Builds an `Effect::Delay` that dispatches `action` after `duration`
///
/// ```rust,ignore
/// use cinemadise_core::delay;
/// use std::time::Duration;
///
/// delay! {
///     duration: Duration::from_millis(2500),
///     action: FlowAction::SplashFinished
/// }
/// ```
#[macro_export]
macro_rules! delay {
    (
        duration: $duration:expr,
        action: $action:expr
    ) => {
        $crate::effect::Effect::Delay {
            duration: $duration,
            action: ::std::boxed::Box::new($action),
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::effect::Effect;
    use std::time::Duration;

    #[derive(Clone, Debug, PartialEq)]
    enum TickAction {
        Settled { reference: u32 },
        TimerFired,
    }

    #[tokio::test]
    async fn async_effect_builds_a_future() {
        let effect = async_effect! {
            Some(TickAction::Settled { reference: 42 })
        };

        match effect {
            Effect::Future(fut) => {
                assert_eq!(fut.await, Some(TickAction::Settled { reference: 42 }));
            },
            other => unreachable!("expected Future, got {other:?}"),
        }
    }

    #[test]
    fn delay_builds_a_delay() {
        let effect = delay! {
            duration: Duration::from_secs(30),
            action: TickAction::TimerFired
        };

        match effect {
            Effect::Delay { duration, action } => {
                assert_eq!(duration, Duration::from_secs(30));
                assert_eq!(*action, TickAction::TimerFired);
            },
            other => unreachable!("expected Delay, got {other:?}"),
        }
    }
}
