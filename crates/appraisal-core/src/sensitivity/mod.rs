pub mod npv_grid;
