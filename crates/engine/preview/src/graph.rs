use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Node payload in a shader graph
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Reads a named mesh attribute (the per-corner color layer)
    Attribute { attribute: String },
    /// Diffuse BSDF closure
    DiffuseBsdf,
    /// Emission closure with constant color and strength
    Emission { color: Vec3, strength: f32 },
    /// The graph's terminal output; its `"Surface"` input receives the
    /// final closure
    Output,
}

#[derive(Debug, Clone)]
pub struct ShaderNode {
    pub name: String,
    pub kind: NodeKind,
}

/// Socket-to-socket connection between two nodes
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderLink {
    pub from_node: usize,
    pub from_socket: String,
    pub to_node: usize,
    pub to_socket: String,
}

/// Small linear shader graph handed to the engine as plain data
///
/// Wiring is by named sockets on the opaque node types, mirroring the
/// engine's node-graph API. Graphs built here are strictly linear chains
/// into the output node; there is no cycle or branch to validate.
#[derive(Debug, Clone)]
pub struct ShaderGraph {
    pub name: String,
    nodes: Vec<ShaderNode>,
    links: Vec<ShaderLink>,
}

impl ShaderGraph {
    /// Create an empty graph carrying only its output node
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: vec![ShaderNode {
                name: "output".into(),
                kind: NodeKind::Output,
            }],
            links: Vec::new(),
        }
    }

    /// Index of the graph's output node
    pub fn output(&self) -> usize {
        0
    }

    pub fn add_node(&mut self, name: impl Into<String>, kind: NodeKind) -> usize {
        self.nodes.push(ShaderNode {
            name: name.into(),
            kind,
        });
        self.nodes.len() - 1
    }

    /// Connect an output socket to an input socket
    pub fn connect(
        &mut self,
        from_node: usize,
        from_socket: &str,
        to_node: usize,
        to_socket: &str,
    ) {
        self.links.push(ShaderLink {
            from_node,
            from_socket: from_socket.into(),
            to_node,
            to_socket: to_socket.into(),
        });
    }

    pub fn nodes(&self) -> &[ShaderNode] {
        &self.nodes
    }

    pub fn links(&self) -> &[ShaderLink] {
        &self.links
    }
}

/// Which closure terminates the voxel surface graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SurfaceStyle {
    #[default]
    Diffuse,
    Emissive,
}

/// Build the voxel surface shader: attribute color into a scattering closure
///
/// The attribute node reads the mesh's per-corner color layer; its color
/// output feeds either a diffuse BSDF or an emission closure depending on
/// `style`, which in turn feeds the graph's surface output.
pub fn surface_graph(attribute: &str, style: SurfaceStyle) -> ShaderGraph {
    let mut graph = ShaderGraph::new("surface");
    let color = graph.add_node(
        "color",
        NodeKind::Attribute {
            attribute: attribute.into(),
        },
    );
    match style {
        SurfaceStyle::Diffuse => {
            let bsdf = graph.add_node("diffuse", NodeKind::DiffuseBsdf);
            graph.connect(color, "Color", bsdf, "Color");
            graph.connect(bsdf, "BSDF", graph.output(), "Surface");
        }
        SurfaceStyle::Emissive => {
            let emission = graph.add_node(
                "emission",
                NodeKind::Emission {
                    color: Vec3::ONE,
                    strength: 1.0,
                },
            );
            graph.connect(color, "Color", emission, "Color");
            graph.connect(emission, "Emission", graph.output(), "Surface");
        }
    }
    graph
}

/// Build the light shader: a constant emission closure into the surface output
pub fn light_graph(color: Vec3, strength: f32) -> ShaderGraph {
    let mut graph = ShaderGraph::new("light");
    let emission = graph.add_node("emission", NodeKind::Emission { color, strength });
    graph.connect(emission, "Emission", graph.output(), "Surface");
    graph
}
