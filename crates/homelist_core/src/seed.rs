//! Initial household catalog inserted into an empty checklist.

use crate::model::household::{Category, Relevance};
use crate::service::item_service::NewItem;

const INITIAL_CATALOG: &[(&str, Category, Relevance, i64)] = &[
    ("Lavadora secadora", Category::Laundry, Relevance::High, 450_000),
    ("Repisa para detergentes", Category::Laundry, Relevance::Low, 25_000),
    ("Colgador plegable", Category::Laundry, Relevance::High, 30_000),
    ("Plancha", Category::Laundry, Relevance::Medium, 20_000),
    ("Tabla de Planchar", Category::Laundry, Relevance::Low, 25_000),
    ("Ganchos para ropa", Category::Laundry, Relevance::High, 10_000),
    ("Canasto ropa sucia", Category::Laundry, Relevance::High, 15_000),
    ("Canasto ropa limpia", Category::Laundry, Relevance::High, 15_000),
    ("Cortina Roller", Category::Laundry, Relevance::High, 40_000),
    ("Refrigerador", Category::Kitchen, Relevance::High, 500_000),
    ("Microondas", Category::Kitchen, Relevance::Medium, 70_000),
    ("Hervidor electrico", Category::Kitchen, Relevance::High, 20_000),
    ("Juego de Ollas", Category::Kitchen, Relevance::High, 80_000),
    ("Sarten grande", Category::Kitchen, Relevance::Medium, 25_000),
    ("Sarten pequeno", Category::Kitchen, Relevance::High, 15_000),
    ("Fuente de vidrio (budinera)", Category::Kitchen, Relevance::Low, 12_000),
    ("Vajilla (12p)", Category::Kitchen, Relevance::High, 60_000),
    ("Vasos (x6)", Category::Kitchen, Relevance::High, 15_000),
    ("Jarro para jugo", Category::Kitchen, Relevance::Low, 8_000),
    ("Tazas (x6)", Category::Kitchen, Relevance::Medium, 18_000),
    ("Juego de Cubiertos", Category::Kitchen, Relevance::High, 30_000),
    ("Colador", Category::Kitchen, Relevance::Low, 5_000),
    ("Paños de cocina", Category::Kitchen, Relevance::High, 7_000),
    ("Abre latas", Category::Kitchen, Relevance::Low, 4_000),
    ("Set de Cuchillos", Category::Kitchen, Relevance::High, 35_000),
    ("Freidora de aire", Category::Kitchen, Relevance::Low, 60_000),
    ("Tostador de pan", Category::Kitchen, Relevance::High, 20_000),
    ("Escobillon y Pala", Category::Kitchen, Relevance::High, 10_000),
    ("Trapeador", Category::Kitchen, Relevance::High, 12_000),
    ("Cafetera", Category::Kitchen, Relevance::Low, 50_000),
    ("Secador de loza", Category::Kitchen, Relevance::Medium, 15_000),
    ("3 sillas altas de cocina americana", Category::Kitchen, Relevance::Medium, 90_000),
    ("Dispensador de lavaloza", Category::Kitchen, Relevance::Medium, 8_000),
    ("Dispensador de jabon", Category::Kitchen, Relevance::Medium, 8_000),
    ("Porta Esponja", Category::Kitchen, Relevance::Medium, 5_000),
    ("Porta servilleta", Category::Kitchen, Relevance::Medium, 6_000),
    ("Porta Toalla absorbente", Category::Kitchen, Relevance::Medium, 10_000),
    ("Licuadora", Category::Kitchen, Relevance::Medium, 45_000),
    ("Set de Tupperware", Category::Kitchen, Relevance::High, 20_000),
    ("Tabla para picar (x2)", Category::Kitchen, Relevance::High, 12_000),
    ("Sofa en L", Category::Living, Relevance::Medium, 600_000),
    ("2 Sillones individuales", Category::Living, Relevance::Low, 250_000),
    ("Mesa de Centro", Category::Living, Relevance::Low, 80_000),
    ("TV 55\"", Category::Living, Relevance::Medium, 350_000),
    ("Mueble para TV", Category::Living, Relevance::Medium, 120_000),
    ("Alfombra", Category::Living, Relevance::Medium, 90_000),
    ("Mesa Lateral", Category::Living, Relevance::Low, 40_000),
    ("Cojines Decorativos (x4)", Category::Living, Relevance::Low, 30_000),
    ("Manta para Sofá", Category::Living, Relevance::Low, 25_000),
    ("Comedor 6 sillas", Category::Dining, Relevance::Medium, 300_000),
    ("Florero", Category::Dining, Relevance::Low, 15_000),
    ("Camino de mesa", Category::Dining, Relevance::Low, 12_000),
    ("Individuales para mesa (x6)", Category::Dining, Relevance::Low, 18_000),
    ("Cama 1.5 plazas", Category::PipeBedroom, Relevance::High, 200_000),
    ("2 juegos de sabanas 1.5p", Category::PipeBedroom, Relevance::High, 50_000),
    ("2 cubrecamas 1.5p", Category::PipeBedroom, Relevance::High, 70_000),
    ("Basurero", Category::PipeBedroom, Relevance::Low, 8_000),
    ("Escritorio", Category::PipeBedroom, Relevance::High, 90_000),
    ("Silla de escritorio", Category::PipeBedroom, Relevance::High, 60_000),
    ("Cortina", Category::PipeBedroom, Relevance::High, 45_000),
    ("Lampara de escritorio", Category::PipeBedroom, Relevance::Medium, 20_000),
    ("Velador", Category::PipeBedroom, Relevance::High, 40_000),
    ("Cama 2 plazas", Category::MainBedroom, Relevance::High, 350_000),
    ("2 juegos de sabanas 2p", Category::MainBedroom, Relevance::High, 70_000),
    ("Cubrecama 2p", Category::MainBedroom, Relevance::High, 50_000),
    ("Almohadas (x2)", Category::MainBedroom, Relevance::High, 30_000),
    ("Velador (x2)", Category::MainBedroom, Relevance::Medium, 80_000),
    ("Lampara de velador (x2)", Category::MainBedroom, Relevance::Medium, 40_000),
    ("Cortinas Roller duo", Category::MainBedroom, Relevance::High, 80_000),
    ("Cómoda / Cajonera", Category::MainBedroom, Relevance::Medium, 120_000),
    ("Toallas de cuerpo (x4)", Category::Bathrooms, Relevance::High, 40_000),
    ("Toallas de mano (x4)", Category::Bathrooms, Relevance::High, 20_000),
    ("Set dispensadores (jabon, shampoo, acond.)", Category::Bathrooms, Relevance::High, 25_000),
    ("Set de baño (escobilla, basurero)", Category::Bathrooms, Relevance::High, 30_000),
    ("Porta Toallas", Category::Bathrooms, Relevance::Medium, 20_000),
    ("Salida de ducha", Category::Bathrooms, Relevance::High, 15_000),
    ("Antideslizante ducha", Category::Bathrooms, Relevance::High, 10_000),
    ("Cortina de baño y forro", Category::Bathrooms, Relevance::High, 20_000),
    ("Sopapo", Category::Bathrooms, Relevance::High, 5_000),
    ("Aspiradora", Category::Other, Relevance::Medium, 100_000),
    ("Set de ampolletas LED", Category::Other, Relevance::High, 25_000),
    ("Arrimo para entrada", Category::Other, Relevance::Low, 70_000),
    ("Espejo cuerpo completo", Category::Other, Relevance::Low, 50_000),
    ("Set de herramientas básico", Category::Other, Relevance::Medium, 30_000),
    ("Alargador / Zapatilla eléctrica (x3)", Category::Other, Relevance::High, 15_000),
    ("Barra con 2 pisos", Category::Terrace1, Relevance::Low, 120_000),
    ("Juego de terraza (2 sillas y mesa)", Category::Terrace2, Relevance::Low, 150_000),
    ("Planta decorativa", Category::Terrace2, Relevance::Low, 30_000),
];

/// Returns the starter catalog as single-unit new items.
pub fn initial_catalog() -> Vec<NewItem> {
    INITIAL_CATALOG
        .iter()
        .map(|&(name, category, relevance, price)| NewItem {
            name: name.to_string(),
            category,
            relevance,
            price,
            quantity: 1,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::initial_catalog;
    use crate::model::household::Category;

    #[test]
    fn catalog_covers_every_space() {
        let catalog = initial_catalog();
        for category in Category::ALL {
            assert!(
                catalog.iter().any(|item| item.category == category),
                "no starter item for {category}"
            );
        }
        assert!(catalog.iter().all(|item| item.price > 0));
    }
}
