use lyon::tessellation::TessellationError;

use crate::spacial::Position;

#[derive(Debug, Clone, Default)]
pub struct PolygonMesh {
    pub vertices: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl PolygonMesh {
    pub fn triangles(&self) -> impl Iterator<Item = [[f32; 2]; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|triangle| {
                [
                    self.vertices[triangle[0] as usize],
                    self.vertices[triangle[1] as usize],
                    self.vertices[triangle[2] as usize],
                ]
            })
    }
}

/// Triangulate a single closed outline, `map` converts each vertex into the target (e.g. pixel) space.
pub fn tessellate_polygon(
    vertices: &[Position],
    map: impl Fn(Position) -> [f32; 2],
) -> Result<PolygonMesh, TessellationError> {
    use lyon::path::Path;
    use lyon::tessellation::{BuffersBuilder, FillOptions, FillRule, FillTessellator, VertexBuffers};

    let mut path_builder = Path::builder();
    if let Some(first) = vertices.first() {
        let [x, y] = map(*first);
        path_builder.begin(lyon::math::Point::new(x, y));
        for pos in &vertices[1..] {
            let [x, y] = map(*pos);
            path_builder.line_to(lyon::math::Point::new(x, y));
        }
        path_builder.close();
    }
    let path = path_builder.build();

    let mut geometry = VertexBuffers::new();
    let mut tessellator = FillTessellator::new();

    tessellator.tessellate_path(
        &path,
        &FillOptions::default().with_fill_rule(FillRule::EvenOdd),
        &mut BuffersBuilder::new(&mut geometry, |vertex: lyon::tessellation::FillVertex| {
            [vertex.position().x, vertex.position().y]
        }),
    )?;

    Ok(PolygonMesh {
        vertices: geometry.vertices,
        indices: geometry.indices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_tessellates_into_two_triangles() {
        // given
        let square = vec![
            Position::new(0.0, 0.0),
            Position::new(1.0, 0.0),
            Position::new(1.0, 1.0),
            Position::new(0.0, 1.0),
        ];

        // when
        let mesh = tessellate_polygon(&square, |p| [p.x as f32, p.y as f32]).unwrap();

        // then
        assert_eq!(mesh.triangles().count(), 2);
    }

    #[test]
    fn test_empty_outline_gives_empty_mesh() {
        let mesh = tessellate_polygon(&[], |p| [p.x as f32, p.y as f32]).unwrap();

        assert!(mesh.indices.is_empty());
    }
}
