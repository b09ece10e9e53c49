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

use std::rc::Rc;

use vitrail_core::renderer::api::*;
use vitrail_core::renderer::traits::{Buffer, GpuResource, InputAssembler, ResourceLifecycle};
use vitrail_core::renderer::ResourceError;

use super::driver::{backend_error, GlObjectKind, GlesShared, VertexBinding, VertexLayout};

/// Vertex input state. When the driver supports vertex array objects the
/// layout is recorded into one; otherwise it is enabled at every bind.
#[derive(Debug)]
pub struct GlesInputAssembler {
    shared: Rc<GlesShared>,
    vertex_array: NativeHandle,
    layout: Rc<VertexLayout>,
    attributes: Vec<VertexAttribute>,
    draw_info: DrawInfo,
}

impl GlesInputAssembler {
    /// Creates an empty input assembler bound to the device.
    pub fn new(shared: Rc<GlesShared>) -> Self {
        Self {
            shared,
            vertex_array: NativeHandle::NONE,
            layout: Rc::new(VertexLayout::default()),
            attributes: Vec::new(),
            draw_info: DrawInfo::default(),
        }
    }

    /// The vertex array object, [`NativeHandle::NONE`] without VAO support.
    pub fn vertex_array(&self) -> NativeHandle {
        self.vertex_array
    }

    /// The resolved vertex layout.
    pub fn layout(&self) -> Rc<VertexLayout> {
        self.layout.clone()
    }

    /// Width of the indices, `None` for non-indexed input.
    pub fn index_format(&self) -> Option<IndexFormat> {
        self.layout.index_buffer.map(|(_, format)| format)
    }

    /// Sets the number of vertices drawn.
    pub fn set_vertex_count(&mut self, count: u32) {
        self.draw_info.vertex_count = count;
    }

    /// Sets the number of indices drawn.
    pub fn set_index_count(&mut self, count: u32) {
        self.draw_info.index_count = count;
    }

    /// Sets the number of instances drawn, `0` for a plain draw.
    pub fn set_instance_count(&mut self, count: u32) {
        self.draw_info.instance_count = count;
    }

    fn invalid(reason: String) -> ResourceError {
        ResourceError::InvalidDescriptor {
            kind: ResourceKind::InputAssembler,
            reason,
        }
    }

    fn resolve_layout(
        descriptor: &InputAssemblerDescriptor<'_>,
    ) -> Result<(Vec<VertexAttribute>, VertexLayout), ResourceError> {
        if descriptor.vertex_buffers.is_empty() {
            return Err(Self::invalid("at least one vertex buffer is required".into()));
        }
        for (stream, buffer) in descriptor.vertex_buffers.iter().enumerate() {
            if !buffer.usage().contains(BufferUsage::VERTEX) || buffer.native_handle().is_none() {
                return Err(Self::invalid(format!(
                    "stream {stream} is not a live vertex buffer"
                )));
            }
        }

        let mut cursors = vec![0u32; descriptor.vertex_buffers.len()];
        let mut attributes = Vec::with_capacity(descriptor.attributes.len());
        let mut bindings = Vec::with_capacity(descriptor.attributes.len());
        for (location, attribute) in descriptor.attributes.iter().enumerate() {
            let stream = attribute.stream as usize;
            let Some(buffer) = descriptor.vertex_buffers.get(stream) else {
                return Err(Self::invalid(format!(
                    "attribute '{}' reads missing stream {stream}",
                    attribute.name
                )));
            };
            let offset = attribute.offset.unwrap_or(cursors[stream]);
            let end = offset.checked_add(attribute.format.size());
            cursors[stream] = end.unwrap_or(u32::MAX);
            if end.map_or(true, |end| end > buffer.stride()) {
                return Err(Self::invalid(format!(
                    "attribute '{}' ends past the stride of stream {stream}",
                    attribute.name
                )));
            }

            attributes.push(VertexAttribute {
                offset: Some(offset),
                ..attribute.clone()
            });
            bindings.push(VertexBinding {
                location: location as u32,
                buffer: buffer.native_handle(),
                format: attribute.format,
                stride: buffer.stride(),
                offset,
                per_instance: attribute.per_instance,
            });
        }

        let index_buffer = match descriptor.index_buffer {
            None => None,
            Some(buffer) => {
                let format = IndexFormat::from_stride(buffer.stride());
                match format {
                    Some(format)
                        if buffer.usage().contains(BufferUsage::INDEX)
                            && !buffer.native_handle().is_none() =>
                    {
                        Some((buffer.native_handle(), format))
                    }
                    _ => return Err(Self::invalid("index buffer is not usable".into())),
                }
            }
        };

        Ok((
            attributes,
            VertexLayout {
                bindings,
                index_buffer,
            },
        ))
    }
}

impl ResourceLifecycle for GlesInputAssembler {
    type Descriptor<'a> = InputAssemblerDescriptor<'a>;
    const KIND: ResourceKind = ResourceKind::InputAssembler;

    fn initialize(
        &mut self,
        descriptor: &InputAssemblerDescriptor<'_>,
    ) -> Result<(), ResourceError> {
        if descriptor.attributes.iter().any(|a| a.per_instance)
            && !self.shared.toggles.use_instanced_arrays
        {
            return Err(Self::invalid(
                "per-instance attributes need instanced arrays".into(),
            ));
        }
        let (attributes, layout) = Self::resolve_layout(descriptor)?;

        self.draw_info = DrawInfo {
            vertex_count: descriptor.vertex_buffers[0].count(),
            index_count: descriptor.index_buffer.map_or(0, |b| b.count()),
            ..DrawInfo::default()
        };
        self.attributes = attributes;
        self.layout = Rc::new(layout);

        if self.shared.toggles.use_vao {
            let driver = &self.shared.driver;
            self.vertex_array = driver
                .create_object(GlObjectKind::VertexArray)
                .map_err(backend_error)?;
            driver
                .configure_vertex_array(self.vertex_array, &self.layout)
                .map_err(backend_error)?;
        }
        Ok(())
    }

    fn destroy(&mut self) {
        if !self.vertex_array.is_none() {
            self.shared
                .driver
                .delete_object(GlObjectKind::VertexArray, self.vertex_array);
            self.vertex_array = NativeHandle::NONE;
        }
    }
}

impl Drop for GlesInputAssembler {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl GpuResource for GlesInputAssembler {
    fn kind(&self) -> ResourceKind {
        ResourceKind::InputAssembler
    }

    fn native_handle(&self) -> NativeHandle {
        self.vertex_array
    }
}

impl InputAssembler for GlesInputAssembler {
    fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    fn draw_info(&self) -> DrawInfo {
        self.draw_info
    }

    fn set_draw_info(&mut self, info: DrawInfo) {
        self.draw_info = info;
    }
}
