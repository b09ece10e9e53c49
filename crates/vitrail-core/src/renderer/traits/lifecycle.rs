// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The two-phase construction protocol shared by every device object.

use crate::renderer::api::util::ResourceKind;
use crate::renderer::error::ResourceError;

/// An object that is allocated empty, then initialized from a descriptor.
///
/// `destroy` must release whatever a partial `initialize` acquired and must
/// be safe to call more than once.
pub trait ResourceLifecycle: Sized {
    /// The descriptor consumed by `initialize`.
    type Descriptor<'a>;

    /// The kind reported in diagnostics.
    const KIND: ResourceKind;

    /// Acquires native objects described by `descriptor`.
    fn initialize(&mut self, descriptor: &Self::Descriptor<'_>) -> Result<(), ResourceError>;

    /// Releases every native object held.
    fn destroy(&mut self);
}

/// Initializes `resource` and returns it, or destroys it and returns the error.
///
/// Every factory of a [`GraphicsDevice`](super::GraphicsDevice) goes through
/// this function, so a caller never observes a half-built object.
pub fn construct<R: ResourceLifecycle>(
    mut resource: R,
    descriptor: &R::Descriptor<'_>,
) -> Result<R, ResourceError> {
    match resource.initialize(descriptor) {
        Ok(()) => {
            log::debug!("Created {}.", R::KIND);
            Ok(resource)
        }
        Err(err) => {
            resource.destroy();
            log::warn!("Failed to create {}: {err}", R::KIND);
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Counters {
        initialized: Cell<u32>,
        destroyed: Cell<u32>,
    }

    struct CountingStub {
        counters: Rc<Counters>,
        live: bool,
    }

    struct StubDescriptor {
        fail: bool,
    }

    impl ResourceLifecycle for CountingStub {
        type Descriptor<'a> = StubDescriptor;
        const KIND: ResourceKind = ResourceKind::Sampler;

        fn initialize(&mut self, descriptor: &StubDescriptor) -> Result<(), ResourceError> {
            self.counters.initialized.set(self.counters.initialized.get() + 1);
            self.live = true;
            if descriptor.fail {
                return Err(ResourceError::Backend("injected".to_string()));
            }
            Ok(())
        }

        fn destroy(&mut self) {
            if self.live {
                self.live = false;
                self.counters.destroyed.set(self.counters.destroyed.get() + 1);
            }
        }
    }

    fn stub(counters: &Rc<Counters>) -> CountingStub {
        CountingStub {
            counters: counters.clone(),
            live: false,
        }
    }

    #[test]
    fn test_construct_success_returns_live_resource() {
        let counters = Rc::new(Counters::default());
        let resource = construct(stub(&counters), &StubDescriptor { fail: false }).unwrap();
        assert!(resource.live);
        assert_eq!(counters.initialized.get(), 1);
        assert_eq!(counters.destroyed.get(), 0);
    }

    #[test]
    fn test_construct_failure_destroys_once() {
        let counters = Rc::new(Counters::default());
        let result = construct(stub(&counters), &StubDescriptor { fail: true });
        assert!(matches!(result, Err(ResourceError::Backend(_))));
        assert_eq!(counters.initialized.get(), 1);
        assert_eq!(counters.destroyed.get(), 1);
    }
}
