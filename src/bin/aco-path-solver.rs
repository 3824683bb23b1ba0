use aco_path::solver::ant_colony::driver;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    driver::run()
}
